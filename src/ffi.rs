//! C ABI for hosts that hold the page themselves
//!
//! The host passes raw HTML plus a JSON request and receives JSON back.
//! Request: `{"mode": "smart", "selection": "...", "selectors": [...]}`
//! where `selection` and `selectors` are optional.
//! Result: `{"mode": "smart", "text": "...", "length": 1234}`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Deserialize;

use crate::catalog::SelectorCatalog;
use crate::extract::Extractor;
use crate::script::{run_request, ExtractionRequest};

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via `jd_free_extraction_result`
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized `ExtractionOutput` (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if extraction failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

#[derive(Debug, Deserialize)]
struct FfiRequest {
    #[serde(flatten)]
    request: ExtractionRequest,
    /// Replaces the built-in catalog for this call
    #[serde(default)]
    selectors: Option<Vec<String>>,
}

/// Extract job-description text from HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON request (null-terminated)
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `jd_free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn jd_extract_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> ExtractionResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        String::new()
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_string(),
            Err(_) => return make_error_result("Invalid UTF-8 in HTML content"),
        }
    };

    if request_json.is_null() {
        return make_error_result("Request JSON is null");
    }
    let request_str = match CStr::from_ptr(request_json).to_str() {
        Ok(s) => s,
        Err(_) => return make_error_result("Invalid UTF-8 in request JSON"),
    };

    let request: FfiRequest = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => return make_error_result(&format!("Failed to parse request JSON: {}", e)),
    };

    let extractor = match &request.selectors {
        Some(patterns) => match SelectorCatalog::from_patterns(patterns) {
            Ok(catalog) => Extractor::new(catalog),
            Err(e) => return make_error_result(&e.to_string()),
        },
        None => Extractor::default(),
    };

    let output = run_request(&extractor, &html, &request.request);

    match serde_json::to_string(&output) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Free an ExtractionResultFFI returned by `jd_extract_from_html`
///
/// # Safety
/// - `result` must have been returned by `jd_extract_from_html`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn jd_free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ExtractionOutput;

    fn call(html: &str, request: &str) -> Result<ExtractionOutput, String> {
        let request = CString::new(request).unwrap();
        unsafe {
            let result = jd_extract_from_html(
                html.as_ptr() as *const c_char,
                html.len(),
                request.as_ptr(),
            );
            let outcome = if result.error_ptr.is_null() {
                let json = CStr::from_ptr(result.json_ptr).to_str().unwrap();
                Ok(serde_json::from_str(json).unwrap())
            } else {
                Err(CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string())
            };
            jd_free_extraction_result(result);
            outcome
        }
    }

    #[test]
    fn test_ffi_page_mode() {
        let output = call("<body><p>Apply now</p></body>", r#"{"mode":"page"}"#).unwrap();
        assert_eq!(output.text, "Apply now");
        assert_eq!(output.length, 9);
    }

    #[test]
    fn test_ffi_selection_and_custom_selectors() {
        let output = call(
            "<body></body>",
            r#"{"mode":"selected","selection":"  highlighted  "}"#,
        )
        .unwrap();
        assert_eq!(output.text, "highlighted");

        let html = format!("<body><div id=\"jd\">{}</div></body>", "z".repeat(900));
        let output = call(&html, r##"{"mode":"smart","selectors":["#jd"]}"##).unwrap();
        assert_eq!(output.length, 900);
    }

    #[test]
    fn test_ffi_errors() {
        let err = call("<body></body>", r#"{"mode":"everything"}"#).unwrap_err();
        assert!(err.starts_with("Failed to parse request JSON"));

        let err = call("<body></body>", r#"{"mode":"smart","selectors":["a[["]}"#).unwrap_err();
        assert_eq!(err, "Invalid selector 'a[['");

        let result = unsafe { jd_extract_from_html(ptr::null(), 0, ptr::null()) };
        assert!(result.json_ptr.is_null());
        assert!(!result.error_ptr.is_null());
        unsafe { jd_free_extraction_result(result) };
    }
}

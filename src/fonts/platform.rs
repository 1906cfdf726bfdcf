//! Operating system font registration primitive.

use std::path::Path;

/// The platform call that adds a font file to the font table.
///
/// Returns the platform's raw result code: the number of fonts added, or
/// zero on failure.
pub trait FontApi: Send + Sync {
    fn add_font_resource(&self, path: &Path) -> i32;
}

/// The real font table of the running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontApi;

#[cfg(windows)]
impl FontApi for SystemFontApi {
    fn add_font_resource(&self, path: &Path) -> i32 {
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Graphics::Gdi::AddFontResourceW;

        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is NUL-terminated and outlives the call.
        unsafe { AddFontResourceW(wide.as_ptr()) }
    }
}

#[cfg(not(windows))]
impl FontApi for SystemFontApi {
    fn add_font_resource(&self, path: &Path) -> i32 {
        tracing::debug!(
            path = %path.display(),
            "Font registration is not supported on this platform"
        );
        0
    }
}

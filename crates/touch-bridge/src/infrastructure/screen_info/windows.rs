//! Windows display enumeration via `EnumDisplayMonitors` / `GetMonitorInfoW`.
//!
//! Bounds are reported in virtual-desktop pixels, the same space
//! `InjectTouchInput` expects for `ptPixelLocation`.

use touch_core::TargetArea;
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
};

use crate::application::select_display::{DisplayEnumerator, ScreenInfoError};

/// `MONITORINFOF_PRIMARY` from `winuser.h`.
const MONITORINFOF_PRIMARY: u32 = 1;

/// Windows implementation of [`DisplayEnumerator`] using Win32 APIs.
pub struct WindowsDisplayEnumerator;

impl WindowsDisplayEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsDisplayEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

/// One monitor as seen during enumeration.
struct FoundMonitor {
    area: TargetArea,
    is_primary: bool,
}

impl DisplayEnumerator for WindowsDisplayEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<TargetArea>, ScreenInfoError> {
        let mut found: Vec<FoundMonitor> = Vec::new();

        // SAFETY: `lpfn` is a valid function pointer with the correct signature.
        // `lParam` is a raw pointer to `found` which outlives this call.
        // The callback is synchronous and called only within `EnumDisplayMonitors`.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut found as *mut Vec<FoundMonitor> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(ScreenInfoError::PlatformError(
                "EnumDisplayMonitors failed".to_string(),
            ));
        }
        if found.is_empty() {
            return Err(ScreenInfoError::NoDisplays);
        }

        // Primary first; the rest keep enumeration order.
        found.sort_by_key(|m| !m.is_primary);
        Ok(found.into_iter().map(|m| m.area).collect())
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`. `lparam` must be a valid
/// pointer to `Vec<FoundMonitor>` for the duration of the enumeration call.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let found = &mut *(lparam.0 as *mut Vec<FoundMonitor>);

    // SAFETY: MONITORINFOEXW is a Plain Old Data struct; zero initialization is valid.
    let mut info: MONITORINFOEXW = std::mem::zeroed();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

    if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
        let rc = &info.monitorInfo.rcMonitor;
        found.push(FoundMonitor {
            area: TargetArea::new(
                rc.left,
                rc.top,
                (rc.right - rc.left).max(0) as u32,
                (rc.bottom - rc.top).max(0) as u32,
            ),
            is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }

    BOOL(1) // continue enumeration
}

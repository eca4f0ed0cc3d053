//=========================================================================
// Platform Signal Mapper
//
// Converts Winit window events into `HostSignal`s.
//
// Responsibilities:
// - Escape (physical) or Back / BrowserBack (logical) presses → EscapePressed
// - Focus changes → FocusChanged
// - Ignore releases, key repeats and everything else
//
//=========================================================================

//=== External Crates =====================================================

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

//=== Internal Modules ====================================================

use crate::core::platform_bridge::HostSignal;

//=== Event Conversion ====================================================

/// Returns the signal carried by `event`, if any.
pub(crate) fn map_window_event(event: &WindowEvent) -> Option<HostSignal> {
    match event {
        WindowEvent::Focused(focused) => Some(HostSignal::FocusChanged(*focused)),
        WindowEvent::KeyboardInput { event, .. } => {
            map_key(event.physical_key, &event.logical_key, event.state, event.repeat)
        }
        _ => None,
    }
}

//--- Keys ----------------------------------------------------------------

/// Escape / Back detection for a single key event.
pub(crate) fn map_key(
    physical: PhysicalKey,
    logical: &Key,
    state: ElementState,
    repeat: bool,
) -> Option<HostSignal> {
    if state != ElementState::Pressed || repeat {
        return None;
    }

    let is_back = matches!(physical, PhysicalKey::Code(KeyCode::Escape))
        || matches!(
            logical,
            Key::Named(NamedKey::Escape | NamedKey::GoBack | NamedKey::BrowserBack)
        );

    is_back.then_some(HostSignal::EscapePressed)
}

//=========================================================================
// Unit Tests
//=========================================================================

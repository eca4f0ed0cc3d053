//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the logic thread's mailbox.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  GameContext     │
//  │   ↓                      │    │   ↓              │
//  │  signal_mapper           │    │  handle_signal   │
//  │   ├─ Focused             │    │   ├─ toggle_pause│
//  │   └─ Escape / Back       │    │   └─ pause_game  │
//  │   ↓                      │    └──────────────────┘
//  │  SignalBuffer            │             ↑
//  │   ↓                      │             │
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  crossbeam channel ──────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Notes:
// - RedrawRequested is the frame boundary; signals are sent in batches
// - `suspended` and focus loss are sent immediately since no redraws
//   may follow them
// - If the logic thread is gone, signals are dropped with a warning so
//   the window can still be closed
//
//=========================================================================

//=== Submodules ==========================================================

mod signal_buffer;
mod signal_mapper;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{HostSignal, PlatformError, PlatformEvent};
use signal_buffer::SignalBuffer;
use signal_mapper::map_window_event;

//=== Platform ============================================================

/// Window owner and host signal source.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and is not
/// `Send`. Talks to the logic thread only through `event_sender`.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    title: String,

    /// Set between `suspended()` and the next `resumed()`.
    suspended: bool,

    buffer: SignalBuffer,

    event_sender: Sender<PlatformEvent>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, title: impl Into<String>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.into(),
            suspended: false,
            buffer: SignalBuffer::new(),
            event_sender,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends everything buffered since the last frame boundary.
    fn flush_signals(&mut self) {
        let Some(signals) = self.buffer.drain() else {
            return;
        };

        let count = signals.len();
        trace!(target: "platform", "Flushing {} host signals", count);

        if self.event_sender.send(PlatformEvent::Signals(signals)).is_err() {
            warn!(target: "platform", "Channel disconnected, dropping {} signals", count);
        }
    }

    /// Buffers `signal`. A focus loss is sent at once: hidden windows
    /// stop receiving redraws, so it could otherwise wait indefinitely.
    fn push_signal(&mut self, signal: HostSignal) {
        let urgent = signal == HostSignal::FocusChanged(false);
        self.buffer.push(signal);
        if urgent {
            self.flush_signals();
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_signals();
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Startup or return from suspension.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.suspended {
            self.suspended = false;
            self.buffer.push(HostSignal::ApplicationPaused(false));
        }

        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.request_exit(event_loop);
            }
        }
    }

    /// The application was sent to the background.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "Application suspended");
        self.suspended = true;
        self.buffer.push(HostSignal::ApplicationPaused(true));
        self.flush_signals();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary
                self.flush_signals();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                if let Some(signal) = map_window_event(&event) {
                    trace!(target: "platform", "Host signal: {:?}", signal);
                    self.push_signal(signal);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

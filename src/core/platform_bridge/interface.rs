//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-core interface types (signals, mailbox events and errors).
//
// Defines the contract between whatever drives the session (the winit
// platform, a headless host, tests) and the logic thread.
//
//=========================================================================

//=== HostSignal ==========================================================

/// Something the host observed that the game flow must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    /// Escape / Back was pressed. Toggles pause.
    EscapePressed,

    /// The application was suspended (`true`) or brought back (`false`).
    ApplicationPaused(bool),

    /// The window gained (`true`) or lost (`false`) input focus.
    FocusChanged(bool),

    /// A scene finished loading.
    SceneLoaded(String),
}

//=== PlatformEvent =======================================================

/// Events sent from the host to the logic thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformEvent {
    /// Signals batched for one frame.
    Signals(Vec<HostSignal>),

    /// Window close or host shutdown requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),

    /// The logic thread is gone and can no longer receive signals.
    Disconnected,
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
            Self::Disconnected => write!(f, "Logic thread disconnected"),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Tests
//=========================================================================

//! Scene host adapter.
//!
//! The host owns at most one [`EngineHandle`] and the container it is
//! mounted into. It is the only way the console reaches the engine, and
//! every call returns immediately: mounting twice is a no-op, unmounting
//! twice is a no-op, and dispatching without a ready receiver reports
//! `false` instead of failing.

use crate::config::EngineConfig;
use crate::engine::EngineHandle;
use crate::error::EngineError;
use crate::event::EventSink;

/// Result of a [`SceneHost::mount`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// A new engine instance was started.
    Mounted,
    /// An engine was already live; nothing was started.
    AlreadyMounted,
}

#[derive(Debug)]
struct Mounted {
    container: String,
    handle: EngineHandle,
}

/// Owns the lifecycle of the embedded scene engine.
#[derive(Debug)]
pub struct SceneHost {
    config: EngineConfig,
    mounted: Option<Mounted>,
}

impl SceneHost {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            mounted: None,
        }
    }

    /// Start an engine in `container`, delivering events to `sink`.
    ///
    /// While an engine is live this is a no-op and `sink` is dropped. Only
    /// acquiring the engine's thread can fail.
    pub fn mount(&mut self, container: &str, sink: EventSink) -> Result<MountOutcome, EngineError> {
        if let Some(mounted) = &self.mounted {
            if mounted.container == container {
                tracing::debug!(container, "engine already mounted, ignoring");
            } else {
                tracing::warn!(
                    container,
                    current = %mounted.container,
                    "engine already mounted elsewhere, unmount first"
                );
            }
            return Ok(MountOutcome::AlreadyMounted);
        }

        let handle = EngineHandle::spawn(self.config.clone(), sink)?;
        tracing::info!(container, id = %handle.id(), "engine mounted");
        self.mounted = Some(Mounted {
            container: container.to_string(),
            handle,
        });
        Ok(MountOutcome::Mounted)
    }

    /// Tear the engine down and release it. Returns `false` if nothing was
    /// mounted.
    pub fn unmount(&mut self) -> bool {
        match self.mounted.take() {
            Some(mounted) => {
                tracing::info!(container = %mounted.container, "unmounting engine");
                mounted.handle.shutdown();
                true
            }
            None => false,
        }
    }

    /// Forward a passthrough command to the active scene.
    ///
    /// `false` means the command went nowhere: no engine, or the engine is
    /// still loading. Nothing is queued for later.
    pub fn dispatch_command(&self, raw: &str) -> bool {
        let delivered = self
            .mounted
            .as_ref()
            .is_some_and(|m| m.handle.send_command(raw));
        if !delivered {
            tracing::debug!(command = raw, "no active receiver for command");
        }
        delivered
    }

    /// Forward a pointer press in engine coordinates.
    pub fn dispatch_pointer(&self, x: f32, y: f32) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.handle.send_pointer(x, y))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Whether a command receiver is installed and accepting commands.
    pub fn is_active(&self) -> bool {
        self.mounted.as_ref().is_some_and(|m| m.handle.is_ready())
    }

    pub fn container(&self) -> Option<&str> {
        self.mounted.as_ref().map(|m| m.container.as_str())
    }

    pub fn handle_id(&self) -> Option<uuid::Uuid> {
        self.mounted.as_ref().map(|m| m.handle.id())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

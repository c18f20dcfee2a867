//! Host collaborators: frame scheduling, resize notification and the passive readout.
//!
//! The renderer never owns an event loop. A host fires [`HostEvent`]s at it, one at a
//! time, and the renderer answers by scheduling at most one next frame.

pub mod headless;
pub mod realtime;

/// Opaque token for a scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Opaque token for a resize-listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Something the host delivers to a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A previously scheduled frame is due.
    Frame(FrameHandle),
    /// The container of the surface changed size.
    Resize(ListenerId),
}

/// "Run before the next repaint" primitive.
pub trait FrameScheduler {
    /// Request one frame callback. The host keeps at most one in flight per renderer.
    fn schedule(&mut self) -> FrameHandle;

    /// Cancel a pending callback. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Container-resize notifications.
pub trait ResizeNotifier {
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Deregister; unknown ids are ignored.
    fn remove_resize_listener(&mut self, id: ListenerId);
}

/// Passive text sink for the frame counter. How (or whether) it is shown is up to the host.
pub trait FrameReadout {
    fn publish(&mut self, text: &str);
}

/// Everything a renderer needs from its host.
pub trait Host: FrameScheduler + ResizeNotifier + FrameReadout {}

impl<T: FrameScheduler + ResizeNotifier + FrameReadout> Host for T {}

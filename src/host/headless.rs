use std::collections::{BTreeSet, VecDeque};

use crate::{
    host::{FrameHandle, FrameReadout, FrameScheduler, HostEvent, ListenerId, ResizeNotifier},
    render::renderer::CurveRenderer,
    surface::Surface,
};

/// Deterministic in-process host.
///
/// Frames fire only when polled, so tests and offline exports step the loop explicitly.
/// Queued resize notifications are delivered before the pending frame, matching a
/// browser that runs resize handlers ahead of the next animation callback.
#[derive(Default)]
pub struct HeadlessHost {
    next_id: u64,
    pending_frame: Option<FrameHandle>,
    listeners: BTreeSet<ListenerId>,
    queued_resizes: VecDeque<ListenerId>,
    readout: Option<String>,
    readout_updates: u64,
    cancelled: u64,
    sink: Option<Box<dyn FnMut(&str)>>,
}

impl std::fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("pending_frame", &self.pending_frame)
            .field("listeners", &self.listeners)
            .field("queued_resizes", &self.queued_resizes)
            .field("readout", &self.readout)
            .field("readout_updates", &self.readout_updates)
            .finish_non_exhaustive()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every published readout to `sink` as well as recording it.
    pub fn with_readout_sink(mut self, sink: impl FnMut(&str) + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Last published readout text.
    pub fn readout(&self) -> Option<&str> {
        self.readout.as_deref()
    }

    pub fn readout_updates(&self) -> u64 {
        self.readout_updates
    }

    /// Number of frame callbacks cancelled before they fired.
    pub fn cancelled_frames(&self) -> u64 {
        self.cancelled
    }

    /// Report a container resize to every registered listener.
    pub fn notify_resize(&mut self) {
        self.queued_resizes.extend(self.listeners.iter().copied());
    }

    /// Next due event, or `None` when nothing is scheduled.
    pub fn poll_event(&mut self) -> Option<HostEvent> {
        while let Some(id) = self.queued_resizes.pop_front() {
            if self.listeners.contains(&id) {
                return Some(HostEvent::Resize(id));
            }
        }
        self.pending_frame.take().map(HostEvent::Frame)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameScheduler for HeadlessHost {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        if let Some(prev) = self.pending_frame.replace(handle) {
            tracing::warn!(?prev, ?handle, "frame scheduled while another was pending");
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
            self.cancelled += 1;
        }
    }
}

impl ResizeNotifier for HeadlessHost {
    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
        self.queued_resizes.retain(|queued| *queued != id);
    }
}

impl FrameReadout for HeadlessHost {
    fn publish(&mut self, text: &str) {
        self.readout = Some(text.to_owned());
        self.readout_updates += 1;
        if let Some(sink) = self.sink.as_mut() {
            sink(text);
        }
    }
}

impl<S: Surface> CurveRenderer<S, HeadlessHost> {
    /// Deliver host events until `frames` frame callbacks ran or nothing is scheduled.
    ///
    /// Returns the number of frame callbacks delivered.
    pub fn run_frames(&mut self, frames: u64) -> u64 {
        let mut delivered = 0;
        while delivered < frames {
            let Some(event) = self.host_mut().poll_event() else {
                break;
            };
            if matches!(event, HostEvent::Frame(_)) {
                delivered += 1;
            }
            self.handle_event(event);
        }
        delivered
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/headless.rs"]
mod tests;

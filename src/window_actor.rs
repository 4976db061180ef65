use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::debug;

use crate::{number::Number, window::Window};

#[derive(Debug)]

/// Owns the number window. Every read and write goes through this actor, so
/// requests never see a window that another request is halfway through
/// changing.
pub struct WindowManager {
    /// The most numbers the window holds at once.
    pub capacity: usize,
}

/// What one merge did to the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub prev: Vec<Number>,
    pub curr: Vec<Number>,
    pub avg: Number,
}

#[derive(Debug)]
pub enum WindowMsg {
    /// Snapshot, merge, snapshot and average as a single step. An empty batch
    /// just reads the window.
    Apply(Vec<Number>, RpcReplyPort<Transition>),
}

#[async_trait::async_trait]
impl Actor for WindowManager {
    type Msg = WindowMsg;
    type State = Window;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self>,
        _: (),
    ) -> Result<Self::State, ActorProcessingErr> {
        debug!("Starting window manager with capacity {}", self.capacity);
        Ok(Window::new(self.capacity))
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self>,
        message: Self::Msg,
        window: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WindowMsg::Apply(numbers, port) => {
                let prev = window.snapshot();
                let inserted = window.merge(numbers);
                debug!(
                    "{} new numbers entered the window, now holding {}/{}",
                    inserted,
                    window.len(),
                    window.capacity()
                );
                let transition = Transition {
                    prev,
                    curr: window.snapshot(),
                    avg: window.average(),
                };
                if port.send(transition).is_err() {
                    debug!("Caller stopped waiting for the window");
                }
            }
        }

        Ok(())
    }
}

pub mod dispatcher;
pub mod handler;
pub mod live;

pub use dispatcher::{
    DispatchError, DispatchStats, DispatcherHandle, EventDispatcher, EventDispatcherBuilder,
    LineFanout,
};
pub use handler::{DispatchContext, LineFn, LineHandler};
pub use live::LiveState;

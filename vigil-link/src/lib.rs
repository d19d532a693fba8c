mod loopback;
pub use loopback::*;
mod negotiate;
pub use negotiate::*;
mod radio;
pub use radio::*;
mod session;
pub use session::*;
mod signal;
pub use signal::*;

pub use tokio_util::sync::CancellationToken;

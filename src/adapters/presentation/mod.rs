//! Presentation adapters - implementations of the `OverlayPresenter` port.

mod stdout_presenter;
mod tracing_presenter;

pub use stdout_presenter::StdoutPresenter;
pub use tracing_presenter::TracingPresenter;

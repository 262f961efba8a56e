/// Why a measurement cycle did not run to completion.
///
/// None of these are failures from the host's point of view: the cycle is simply skipped and
/// the next event schedules a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CycleAbort {
    #[error("viewport is not attached")]
    ViewportDetached,
    #[error("content surface is not attached")]
    ContentDetached,
    #[error("content surface disconnected during measurement")]
    Disconnected,
    #[error("controller has been torn down")]
    Destroyed,
}

/// Whether the tracker currently follows a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// No package selected; the next frame runs the priority selector
    #[default]
    NoneTracked,
    /// A package is being followed across frames
    Tracking,
}

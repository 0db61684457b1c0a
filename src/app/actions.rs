#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
    Stop,
    NextTrack,
    PrevTrack,
    SeekForward,
    SeekBack,
    /// Jump to this many tenths of the track
    SeekTenths(u8),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    CycleRepeat,
    ToggleShuffle,
    Resize,
}

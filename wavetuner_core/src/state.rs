//! Tuning state machine vocabulary.

/// The single variable governing controller behaviour.
///
/// The VVA arc (`SetModeVvaAll` … `ComparePower`) finds the gain that puts
/// the open-loop peak at the target maximum; the ALC arc (`SetModeAlc` …
/// `WaitForAlcStable`) verifies the regulated minimum; the finalize arc
/// re-measures the peak before logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningState {
    Idle,
    CheckAmpMode,
    InitialModeVva,
    InitialVvaLevel,
    InitialModeAlc,
    InitialAlcLevel,
    SetOnline,
    SetInitialGain,
    StartWaveform,
    WaitForPrompt,
    SetModeVvaAll,
    SetVvaLevelAll,
    QueryFwdPwr,
    WaitForStable,
    StopWaveform,
    ComparePower,
    AdjustGainUp,
    AdjustGainDown,
    SetModeAlc,
    PreSetAlc,
    StartWaveformAlc,
    WaitForPromptAlc,
    QueryFwdPwrAlc,
    WaitForAlcStable,
    AdjustMinDown,
    FinalizeTuning,
    RecheckMax,
    WaitForMaxStable,
    LogResults,
    RetryAfterFault,
}

/// What the single-shot timer does when it fires. Exactly one of these is
/// armed at a time; scheduling replaces any previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pending {
    Enter(TuningState),
    /// Second stage of `FinalizeTuning`: raise VVA level and clear buffers.
    FinalizeVvaLevel,
    /// The bounded wait for the generator readiness prompt expired.
    PromptTimeout,
}

//! End-to-end session tests against fake collaborators.
//!
//! # Oracle pattern
//!
//! Each test drives the runtime through handle commands and injected wire
//! events, then checks two oracles: the snapshot feed (consumer-visible
//! state) and the call logs of the fake collaborators (side-effect order).

use std::{future::Future, time::Duration};

use lectern_session::{
    MediaEngine, ParticipantId, RecordingRequest, RecordingService, Role, Runtime, SessionConfig,
    SessionError, SessionEvent, SessionHandle, SessionNotice, SessionPhase, SessionSnapshot,
    ShareState, SignalingClient, StreamId,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::timeout,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;
type CallLog = mpsc::UnboundedReceiver<&'static str>;

const WAIT: Duration = Duration::from_secs(5);

struct FakeSignaling {
    calls: mpsc::UnboundedSender<&'static str>,
    fail_join: bool,
    fail_leave: bool,
}

impl SignalingClient for FakeSignaling {
    fn join(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        let _ = self.calls.send("join");
        let fail = self.fail_join;
        async move {
            if fail { Err(SessionError::Signaling("denied".into())) } else { Ok(()) }
        }
    }

    fn leave(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        let _ = self.calls.send("leave");
        let fail = self.fail_leave;
        async move {
            if fail { Err(SessionError::Signaling("timeout".into())) } else { Ok(()) }
        }
    }

    fn broadcast(&mut self, _text: &str) {
        let _ = self.calls.send("broadcast");
    }

    fn start_sharing(&mut self) {
        let _ = self.calls.send("start_sharing");
    }

    fn stop_sharing(&mut self) {
        let _ = self.calls.send("stop_sharing");
    }

    fn init_data_channel(&mut self) {
        let _ = self.calls.send("init_data_channel");
    }

    fn prepare_sharing(&mut self) {
        let _ = self.calls.send("prepare_sharing");
    }

    fn destruct_sharing(&mut self) {
        let _ = self.calls.send("destruct_sharing");
    }
}

struct FakeMedia {
    calls: mpsc::UnboundedSender<&'static str>,
    fail: bool,
}

impl FakeMedia {
    fn outcome(&self) -> Result<(), SessionError> {
        if self.fail { Err(SessionError::MediaAttach("no renderer".into())) } else { Ok(()) }
    }
}

impl MediaEngine for FakeMedia {
    fn attach_local(&mut self, _slot: StreamId) -> Result<(), SessionError> {
        let _ = self.calls.send("attach_local");
        self.outcome()
    }

    fn subscribe_remote(
        &mut self,
        _sharer: ParticipantId,
        _slot: StreamId,
    ) -> Result<(), SessionError> {
        let _ = self.calls.send("subscribe_remote");
        self.outcome()
    }

    fn detach(&mut self, _slot: StreamId) -> Result<(), SessionError> {
        let _ = self.calls.send("detach");
        self.outcome()
    }
}

#[derive(Clone)]
struct FakeRecorder {
    calls: mpsc::UnboundedSender<&'static str>,
    ok: bool,
}

impl RecordingService for FakeRecorder {
    fn start(
        &self,
        _request: RecordingRequest,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        let calls = self.calls.clone();
        let ok = self.ok;
        async move {
            let _ = calls.send("record_start");
            if ok { Ok(()) } else { Err(SessionError::Recording("503".into())) }
        }
    }

    fn stop(
        &self,
        _request: RecordingRequest,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        let calls = self.calls.clone();
        let ok = self.ok;
        async move {
            let _ = calls.send("record_stop");
            if ok { Ok(()) } else { Err(SessionError::Recording("503".into())) }
        }
    }
}

struct Fixture {
    handle: SessionHandle,
    snapshots: watch::Receiver<SessionSnapshot>,
    signaling_calls: CallLog,
    media_calls: CallLog,
    recorder_calls: CallLog,
    task: JoinHandle<()>,
}

/// Which fake collaborators reject their calls.
#[derive(Clone, Copy, Default)]
struct FaultPlan {
    join: bool,
    leave: bool,
    recorder: bool,
    media: bool,
}

/// Spin up a runtime with fake collaborators. Our own uid is 1.
fn start_session(faults: FaultPlan) -> Fixture {
    let config = SessionConfig {
        app_id: "app".into(),
        channel: "algebra-101".into(),
        uid: 1,
        display_name: "Me".into(),
        role: Role::Presenter,
    };

    let (sig_tx, signaling_calls) = mpsc::unbounded_channel();
    let (media_tx, media_calls) = mpsc::unbounded_channel();
    let (rec_tx, recorder_calls) = mpsc::unbounded_channel();

    let signaling =
        FakeSignaling { calls: sig_tx, fail_join: faults.join, fail_leave: faults.leave };
    let media = FakeMedia { calls: media_tx, fail: faults.media };
    let recorder = FakeRecorder { calls: rec_tx, ok: !faults.recorder };

    let (runtime, handle) = Runtime::new(config, signaling, media, recorder);
    let snapshots = handle.snapshots();
    let task = tokio::spawn(runtime.run());

    Fixture { handle, snapshots, signaling_calls, media_calls, recorder_calls, task }
}

/// Wait until the feed publishes a snapshot matching the predicate.
async fn wait_until<F>(
    rx: &mut watch::Receiver<SessionSnapshot>,
    mut pred: F,
) -> Result<SessionSnapshot, Box<dyn std::error::Error>>
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    let snapshot = timeout(WAIT, async {
        loop {
            {
                let current = rx.borrow_and_update();
                if pred(&current) {
                    return Ok::<SessionSnapshot, watch::error::RecvError>(current.clone());
                }
            }
            rx.changed().await?;
        }
    })
    .await??;
    Ok(snapshot)
}

/// Everything recorded on a call log so far.
fn drain(calls: &mut CallLog) -> Vec<&'static str> {
    let mut out = Vec::new();
    while let Ok(call) = calls.try_recv() {
        out.push(call);
    }
    out
}

fn presenter_added(id: ParticipantId, name: &str) -> SessionEvent {
    SessionEvent::ParticipantAdded {
        id,
        role: Role::Presenter,
        display_name: name.into(),
        stream: Some(id),
    }
}

#[tokio::test]
async fn classroom_session_end_to_end() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let events = fx.handle.event_sender();

    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    events.send(presenter_added(5, "Alice")).await?;
    let snap = wait_until(&mut fx.snapshots, |s| !s.roster.presenters.is_empty()).await?;
    assert_eq!(snap.roster.presenters[0].display_name, "Alice");
    assert_eq!(snap.roster.presenter_name, "Alice");

    events
        .send(SessionEvent::ChatMessage {
            text: "hi".into(),
            sender: 5,
            sender_name: "Alice".into(),
            sender_role: Role::Presenter,
            timestamp_ms: 42,
        })
        .await?;
    let snap = wait_until(&mut fx.snapshots, |s| !s.messages.is_empty()).await?;
    assert_eq!(snap.messages[0].text, "hi");
    assert_eq!(snap.messages[0].sender_name, "Alice");
    assert!(!snap.messages[0].local);

    fx.handle.leave().await?;
    let snap = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Left).await?;

    // Stale but still queryable.
    assert!(snap.stale);
    assert_eq!(snap.roster.presenters.len(), 1);

    timeout(WAIT, fx.task).await??;

    let calls = drain(&mut fx.signaling_calls);
    let order: Vec<&str> = calls
        .iter()
        .copied()
        .filter(|c| ["join", "init_data_channel", "destruct_sharing", "leave"].contains(c))
        .collect();
    assert_eq!(order, ["join", "init_data_channel", "destruct_sharing", "leave"]);
    assert!(calls.contains(&"prepare_sharing"));
    Ok(())
}

#[tokio::test]
async fn share_toggle_issues_one_start_then_one_stop() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.toggle_share().await?;
    let snap = wait_until(&mut fx.snapshots, |s| s.share == ShareState::LocalSharing).await?;
    assert!(matches!(snap.notice, Some(SessionNotice::ShareStarted { sharer: 1 })));

    fx.handle.toggle_share().await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.share == ShareState::Idle).await?;

    let calls = drain(&mut fx.signaling_calls);
    let shares: Vec<&str> =
        calls.iter().copied().filter(|c| c.ends_with("_sharing") && *c != "prepare_sharing").collect();
    assert_eq!(shares, ["start_sharing", "stop_sharing"]);

    let media = drain(&mut fx.media_calls);
    assert_eq!(media, ["attach_local", "detach"]);
    Ok(())
}

#[tokio::test]
async fn remote_share_subscribes_the_slot() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let events = fx.handle.event_sender();
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    events.send(SessionEvent::ShareStarted { slot: 2, sharer: 9 }).await?;
    let snap =
        wait_until(&mut fx.snapshots, |s| s.share == ShareState::RemoteSharing { sharer: 9 })
            .await?;
    assert!(matches!(snap.notice, Some(SessionNotice::ShareStarted { sharer: 9 })));

    events.send(SessionEvent::ShareEnded { slot: 2, sharer: 9 }).await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.share == ShareState::Idle).await?;

    let media = drain(&mut fx.media_calls);
    assert_eq!(media, ["subscribe_remote", "detach"]);
    Ok(())
}

#[tokio::test]
async fn rejected_media_attach_does_not_block_share_state() -> TestResult {
    let mut fx = start_session(FaultPlan { media: true, ..FaultPlan::default() });
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.toggle_share().await?;
    let snap = wait_until(&mut fx.snapshots, |s| s.share == ShareState::LocalSharing).await?;
    assert!(matches!(snap.notice, Some(SessionNotice::ShareStarted { sharer: 1 })));

    // The attach was attempted and rejected; the announcement still went out.
    assert_eq!(drain(&mut fx.media_calls), ["attach_local"]);
    assert!(drain(&mut fx.signaling_calls).contains(&"start_sharing"));

    // Later share events still land in the snapshot.
    fx.handle.event_sender().send(SessionEvent::ShareStarted { slot: 2, sharer: 9 }).await?;
    let snap =
        wait_until(&mut fx.snapshots, |s| s.share == ShareState::RemoteSharing { sharer: 9 })
            .await?;
    assert!(matches!(snap.notice, Some(SessionNotice::ShareStarted { sharer: 9 })));
    Ok(())
}

#[tokio::test]
async fn blank_messages_are_not_broadcast() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.send_message("   ").await?;
    fx.handle.send_message("hello").await?;
    fx.handle.leave().await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Left).await?;
    timeout(WAIT, fx.task).await??;

    let broadcasts =
        drain(&mut fx.signaling_calls).iter().filter(|c| **c == "broadcast").count();
    assert_eq!(broadcasts, 1);
    Ok(())
}

#[tokio::test]
async fn join_failure_surfaces_and_returns_to_not_joined() -> TestResult {
    let mut fx = start_session(FaultPlan { join: true, ..FaultPlan::default() });

    let snap = wait_until(&mut fx.snapshots, |s| {
        matches!(s.notice, Some(SessionNotice::JoinFailed { .. }))
    })
    .await?;
    assert_eq!(snap.phase, SessionPhase::NotJoined);

    // Leaving from NotJoined still shuts the session down.
    fx.handle.leave().await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Left).await?;
    timeout(WAIT, fx.task).await??;
    Ok(())
}

#[tokio::test]
async fn leave_failure_still_exits_locally() -> TestResult {
    let mut fx = start_session(FaultPlan { leave: true, ..FaultPlan::default() });
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.leave().await?;
    let snap = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Left).await?;
    assert!(matches!(snap.notice, Some(SessionNotice::LeaveFailed { .. })));
    assert!(snap.stale);

    timeout(WAIT, fx.task).await??;
    Ok(())
}

#[tokio::test]
async fn teardown_stops_active_share_before_leaving() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.toggle_share().await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.share == ShareState::LocalSharing).await?;

    fx.handle.leave().await?;
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Left).await?;
    timeout(WAIT, fx.task).await??;

    let calls = drain(&mut fx.signaling_calls);
    let order: Vec<&str> = calls
        .iter()
        .copied()
        .filter(|c| ["stop_sharing", "destruct_sharing", "leave"].contains(c))
        .collect();
    assert_eq!(order, ["stop_sharing", "destruct_sharing", "leave"]);
    Ok(())
}

#[tokio::test]
async fn recording_success_round_trip() -> TestResult {
    let mut fx = start_session(FaultPlan::default());
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.start_recording().await?;
    let snap = wait_until(&mut fx.snapshots, |s| s.recording).await?;
    assert!(!snap.recording_pending);

    fx.handle.stop_recording().await?;
    let snap = wait_until(&mut fx.snapshots, |s| !s.recording).await?;
    assert!(!snap.recording_pending);

    let calls = drain(&mut fx.recorder_calls);
    assert_eq!(calls, ["record_start", "record_stop"]);
    Ok(())
}

#[tokio::test]
async fn recording_failure_clears_pending_without_recording() -> TestResult {
    let mut fx = start_session(FaultPlan { recorder: true, ..FaultPlan::default() });
    let _ = wait_until(&mut fx.snapshots, |s| s.phase == SessionPhase::Joined).await?;

    fx.handle.start_recording().await?;
    // The request was issued; the pending flag is visible by then.
    let invoked = timeout(WAIT, fx.recorder_calls.recv()).await?;
    assert_eq!(invoked, Some("record_start"));

    let snap = wait_until(&mut fx.snapshots, |s| !s.recording_pending).await?;
    assert!(!snap.recording);
    Ok(())
}

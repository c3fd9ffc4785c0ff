use async_trait::async_trait;
use board_agents::{
    BoardPipeline, ChatMessage, GenerationClient, GenerationError, PipelineError, Role,
    SessionState, Stage, StateError, Synthesizer, CHAIRPERSON_INSTRUCTION,
};
use generation_client::EchoClient;
use std::sync::{Arc, Mutex};

const QUESTION: &str = "Should I buy bonds?";

/// Fails whenever it is asked to speak with the given persona
struct FailingOn {
    persona: &'static str,
}

#[async_trait]
impl GenerationClient for FailingOn {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        if messages[0].content == self.persona {
            return Err(GenerationError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        EchoClient::new().generate(messages).await
    }
}

/// Echoes, and remembers the context message of every call
#[derive(Default)]
struct ContextRecorder {
    contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationClient for ContextRecorder {
    fn name(&self) -> &str {
        "context-recorder"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        self.contexts.lock().unwrap().push(messages[1].content.clone());
        Ok(format!("{} take", messages[0].content.split('.').next().unwrap_or_default()))
    }
}

#[tokio::test]
async fn echo_board_produces_four_ordered_lines_and_echoed_recommendation() {
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    let state = pipeline.run(QUESTION).await.unwrap();

    let transcript = state.discussion().render();
    let lines: Vec<&str> = transcript.lines().collect();
    assert_eq!(
        lines,
        [
            "Strategist: Should I buy bonds?",
            "Technical: Should I buy bonds?",
            "Risk: Should I buy bonds?",
            "Platform: Should I buy bonds?",
        ]
    );
    assert_eq!(state.final_recommendation(), Some(QUESTION));
    for role in Role::ALL {
        assert_eq!(state.response(role), Some(QUESTION));
    }
}

#[tokio::test]
async fn transcript_grows_by_one_own_turn_per_step() {
    let client = EchoClient::new();
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    let mut state = SessionState::new(QUESTION).unwrap();

    for agent in pipeline.agents() {
        let before = state.clone();
        let delta = agent.run(&before, &client).await.unwrap();
        state = before.apply(delta).unwrap();

        let (old, new) = (before.discussion(), state.discussion());
        assert!(old.is_prefix_of(new));
        assert_ne!(old, new);
        assert_eq!(new.len(), old.len() + 1);
        assert_eq!(new.last().unwrap().role, agent.role());
        assert!(new
            .render()
            .lines()
            .last()
            .unwrap()
            .starts_with(&format!("{}:", agent.role().display_name())));
    }
}

#[tokio::test]
async fn each_response_is_written_once_by_its_own_role() {
    let client = EchoClient::new();
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    let mut state = SessionState::new(QUESTION).unwrap();

    for agent in pipeline.agents() {
        let others_before: Vec<_> = Role::ALL
            .iter()
            .filter(|r| **r != agent.role())
            .map(|r| state.response(*r).map(str::to_string))
            .collect();

        let delta = agent.run(&state, &client).await.unwrap();
        state = state.apply(delta).unwrap();

        let others_after: Vec<_> = Role::ALL
            .iter()
            .filter(|r| **r != agent.role())
            .map(|r| state.response(*r).map(str::to_string))
            .collect();
        assert_eq!(others_before, others_after);

        // A second turn by the same role is refused
        let again = agent.run(&state, &client).await.unwrap();
        assert_eq!(
            state.apply(again).unwrap_err(),
            StateError::ResponseAlreadyRecorded(agent.role())
        );
    }
    assert_eq!(state.responses().len(), 4);
}

#[tokio::test]
async fn failure_at_risk_keeps_only_earlier_turns() {
    let pipeline = BoardPipeline::new(Arc::new(FailingOn {
        persona: Role::Risk.instruction(),
    }));

    let err = pipeline.run(QUESTION).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Risk));
    assert!(matches!(
        err,
        PipelineError::StepFailed {
            source: GenerationError::Api { status: 503, .. },
            ..
        }
    ));

    let state = err.committed_state().unwrap();
    assert_eq!(state.response(Role::Strategist), Some(QUESTION));
    assert_eq!(state.response(Role::Technical), Some(QUESTION));
    assert!(state.response(Role::Risk).is_none());
    assert!(state.response(Role::Platform).is_none());
    assert!(state.final_recommendation().is_none());
    assert_eq!(state.discussion().len(), 2);
}

#[tokio::test]
async fn failure_at_synthesizer_leaves_full_discussion_without_recommendation() {
    let pipeline = BoardPipeline::new(Arc::new(FailingOn {
        persona: CHAIRPERSON_INSTRUCTION,
    }));

    let err = pipeline.run(QUESTION).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Synthesizer));

    let state = err.committed_state().unwrap();
    assert_eq!(state.responses().len(), 4);
    assert_eq!(state.discussion().len(), 4);
    assert!(state.final_recommendation().is_none());
}

#[tokio::test]
async fn synthesizer_is_idempotent_and_adds_no_turn() {
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    let state = pipeline.run(QUESTION).await.unwrap();
    let client = EchoClient::new();
    let synthesizer = Synthesizer::new();

    let first = synthesizer.run(&state, &client).await.unwrap();
    let second = synthesizer.run(&state, &client).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(state.discussion().len(), 4);
    assert_eq!(state.discussion().render().lines().count(), 4);
}

#[tokio::test]
async fn strategist_speaks_first_with_empty_context() {
    let state = SessionState::new(QUESTION).unwrap();
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    let strategist = &pipeline.agents()[0];
    assert_eq!(strategist.role(), Role::Strategist);

    let delta = strategist.run(&state, &EchoClient::new()).await.unwrap();
    let state = state.apply(delta).unwrap();
    assert_eq!(state.discussion().render(), "Strategist: Should I buy bonds?");
}

#[tokio::test]
async fn later_members_see_earlier_turns_only_through_the_transcript() {
    let recorder = Arc::new(ContextRecorder::default());
    let pipeline = BoardPipeline::new(recorder.clone());
    let state = pipeline.run(QUESTION).await.unwrap();

    let contexts = recorder.contexts.lock().unwrap().clone();
    assert_eq!(contexts.len(), 5);
    assert_eq!(contexts[0], "Discussion so far: ");
    assert_eq!(
        contexts[1],
        "Discussion so far: Strategist: You're a Market Strategist take"
    );
    for (i, context) in contexts.iter().enumerate().take(4).skip(1) {
        assert!(context.starts_with("Discussion so far: "));
        assert_eq!(context.lines().count(), i);
    }
    // The chairperson receives the bare transcript
    assert_eq!(contexts[4], state.discussion().render());
}

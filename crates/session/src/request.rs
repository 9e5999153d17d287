//! Transcript → wire request.
//!
//! The persona instruction must reach the endpoint exactly once per
//! session. In [`InstructionMode::FirstUserTurn`] it is prefixed onto the
//! very first user message, and later requests replay the transcript from
//! the first USER turn onward (the seeded greeting is never echoed). In
//! [`InstructionMode::SystemRole`] it rides along as the endpoint's system
//! instruction instead and turns are serialized as-is.

use pl_domain::config::{GenerationConfig, InstructionMode, SessionConfig};
use pl_domain::turn::Turn;
use pl_providers::{GenerateRequest, WireTurn};

/// Build the request for `input`, given the transcript as it was *before*
/// the new USER turn was appended.
pub fn build_request(
    history: &[Turn],
    input: &str,
    session: &SessionConfig,
    generation: &GenerationConfig,
) -> GenerateRequest {
    let has_persona = !session.persona.trim().is_empty();
    let mut turns = Vec::with_capacity(history.len() + 1);

    match history.iter().position(Turn::is_user) {
        None => {
            let content = if has_persona && session.instruction_mode == InstructionMode::FirstUserTurn
            {
                format!("{}\n\nUser: {input}", session.persona)
            } else {
                input.to_owned()
            };
            turns.push(WireTurn::user(content));
        }
        Some(first_user) => {
            turns.extend(history[first_user..].iter().map(|turn| WireTurn {
                role: turn.speaker.into(),
                content: turn.text.clone(),
            }));
            turns.push(WireTurn::user(input));
        }
    }

    let system_instruction = (has_persona
        && session.instruction_mode == InstructionMode::SystemRole)
        .then(|| session.persona.clone());

    GenerateRequest {
        turns,
        system_instruction,
        max_output_length: generation.max_output_tokens,
        temperature: generation.temperature,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use pl_domain::turn::Speaker;
    use pl_providers::WireRole;

    fn turn(id: u64, speaker: Speaker, text: &str) -> Turn {
        Turn {
            id,
            speaker,
            text: text.into(),
            created_at: Default::default(),
        }
    }

    fn session(persona: &str, mode: InstructionMode) -> SessionConfig {
        SessionConfig {
            persona: persona.into(),
            instruction_mode: mode,
            ..Default::default()
        }
    }

    fn roles(req: &GenerateRequest) -> Vec<WireRole> {
        req.turns.iter().map(|t| t.role).collect()
    }

    #[test]
    fn first_input_is_combined_with_persona() {
        let req = build_request(
            &[],
            "What is dharma?",
            &session("You are a guide.", InstructionMode::FirstUserTurn),
            &GenerationConfig::default(),
        );
        assert_eq!(req.turns.len(), 1);
        assert_eq!(req.turns[0].role, WireRole::User);
        assert_eq!(req.turns[0].content, "You are a guide.\n\nUser: What is dharma?");
        assert!(req.system_instruction.is_none());
        assert_eq!(req.max_output_length, 500);
    }

    #[test]
    fn greeting_alone_still_counts_as_first_input() {
        let history = [turn(1, Speaker::Assistant, "Namaste!")];
        let req = build_request(
            &history,
            "hello",
            &session("P", InstructionMode::FirstUserTurn),
            &GenerationConfig::default(),
        );
        assert_eq!(req.turns.len(), 1);
        assert_eq!(req.turns[0].content, "P\n\nUser: hello");
    }

    #[test]
    fn one_prior_exchange_yields_three_elements() {
        let history = [
            turn(1, Speaker::Assistant, "Namaste!"),
            turn(2, Speaker::User, "What is dharma?"),
            turn(3, Speaker::Assistant, "Righteous duty."),
        ];
        let req = build_request(
            &history,
            "And karma?",
            &session("P", InstructionMode::FirstUserTurn),
            &GenerationConfig::default(),
        );
        assert_eq!(
            roles(&req),
            vec![WireRole::User, WireRole::Model, WireRole::User]
        );
        assert_eq!(req.turns[0].content, "What is dharma?");
        assert_eq!(req.turns[1].content, "Righteous duty.");
        assert_eq!(req.turns[2].content, "And karma?");
    }

    #[test]
    fn empty_persona_sends_input_verbatim() {
        let req = build_request(
            &[],
            "hi",
            &session("   ", InstructionMode::FirstUserTurn),
            &GenerationConfig::default(),
        );
        assert_eq!(req.turns[0].content, "hi");
    }

    #[test]
    fn system_role_mode_keeps_persona_out_of_turns() {
        let cfg = session("You are a guide.", InstructionMode::SystemRole);
        let first = build_request(&[], "hi", &cfg, &GenerationConfig::default());
        assert_eq!(first.turns[0].content, "hi");
        assert_eq!(first.system_instruction.as_deref(), Some("You are a guide."));

        let history = [
            turn(1, Speaker::User, "hi"),
            turn(2, Speaker::Assistant, "hello"),
        ];
        let later = build_request(&history, "again", &cfg, &GenerationConfig::default());
        assert_eq!(later.turns.len(), 3);
        assert_eq!(later.system_instruction.as_deref(), Some("You are a guide."));
    }

    #[test]
    fn generation_parameters_are_copied() {
        let generation = GenerationConfig {
            max_output_tokens: 64,
            temperature: 0.1,
        };
        let req = build_request(&[], "x", &SessionConfig::default(), &generation);
        assert_eq!(req.max_output_length, 64);
        assert!((req.temperature - 0.1).abs() < f32::EPSILON);
    }
}

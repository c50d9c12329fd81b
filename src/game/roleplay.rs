//! Roleplay threads attached to scenes

use super::Game;
use crate::content::{RoleplayLine, Scene};
use crate::core::error::{Result, SimError};
use crate::core::types::now_ms;
use crate::llm::parser::parse_roleplay_reply;
use crate::llm::{AiAction, AiContext, AiRequest, AiResult};
use crate::state::RoleplayMessage;
use crate::ui::state::Notice;
use rand::seq::SliceRandom;
use serde_json::json;

pub const USER_ROLE: &str = "You";
pub const AI_ROLE: &str = "AI";

/// Replies used when neither the AI nor the scene provides any
const DEFAULT_FALLBACKS: &[&str] = &[
    "Let me confirm the definitions first so we are not debating different numbers.",
    "I suggest we agree on the primary metric and its guardrails before ramping up.",
    "I can draft a minimal end-to-end plan, validate it, then expand.",
    "To keep risk down, let's add a low-confidence fallback and a rollback switch.",
];

/// Characters of the user's message quoted back in a local reply
const QUOTE_CHARS: usize = 24;

impl Game {
    fn roleplay_scene(&self) -> Result<(Scene, String)> {
        let scene = self
            .current_scene()
            .cloned()
            .ok_or_else(|| SimError::SceneNotFound(self.state.scene_id.clone()))?;
        let id = scene
            .roleplay_id()
            .ok_or_else(|| SimError::Validation(format!("scene {} has no roleplay", scene.id)))?;
        Ok((scene, id))
    }

    /// Messages of the current scene's roleplay thread
    pub fn roleplay_thread(&self) -> &[RoleplayMessage] {
        self.current_scene()
            .and_then(Scene::roleplay_id)
            .and_then(|id| self.state.roleplay.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn append_roleplay(&mut self, id: &str, role: &str, text: String) {
        self.state
            .roleplay
            .entry(id.to_string())
            .or_default()
            .push(RoleplayMessage {
                role: role.to_string(),
                text,
                at: now_ms(),
            });
    }

    /// Send a message in the current scene's roleplay
    ///
    /// Returns the proxy request when the AI is available; otherwise a local
    /// reply is appended immediately and `None` is returned.
    pub fn begin_roleplay(&mut self, text: &str) -> Result<Option<AiRequest>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SimError::Validation("message is empty".into()));
        }
        let (scene, id) = self.roleplay_scene()?;

        if !self.ai_available() {
            self.append_roleplay(&id, USER_ROLE, text.to_string());
            let reply = self.local_roleplay_reply(&scene, text);
            self.append_roleplay(&id, AI_ROLE, reply);
            self.commit();
            return Ok(None);
        }

        self.begin_ai(AiAction::RoleplayStep)?;
        // Thread context is taken before the new message is appended
        let thread = self.thread_for_model(&scene, &id);
        self.append_roleplay(&id, USER_ROLE, text.to_string());
        self.state.ui.error = None;
        self.commit();

        let payload = AiContext::from_state(&self.state, Some(&scene)).into_payload(json!({
            "roleplay": scene.roleplay,
            "thread": thread,
            "userText": text,
        }));
        Ok(Some(AiRequest {
            action: AiAction::RoleplayStep,
            payload,
        }))
    }

    /// Append the AI reply, or a local one when the result is unusable
    pub fn apply_roleplay(&mut self, text: &str, result: Option<AiResult>) -> Result<()> {
        self.end_ai(AiAction::RoleplayStep);
        let (scene, id) = self.roleplay_scene()?;
        let reply = match result.as_ref().and_then(parse_roleplay_reply) {
            Some(reply) => reply.into_text(),
            None => {
                tracing::warn!("AI roleplay reply unusable, using local fallback");
                self.state.ui.notify(&Notice::AiFallback);
                self.state.ui.fail("AI service unavailable");
                self.local_roleplay_reply(&scene, text.trim())
            }
        };
        self.append_roleplay(&id, AI_ROLE, reply);
        self.commit();
        Ok(())
    }

    /// The last few messages, or the scene's starter lines for an empty thread
    fn thread_for_model(&self, scene: &Scene, id: &str) -> Vec<RoleplayLine> {
        let thread = self.state.roleplay.get(id).map(Vec::as_slice).unwrap_or(&[]);
        if thread.is_empty() {
            return scene
                .roleplay
                .as_ref()
                .map(|rp| rp.starter.clone())
                .unwrap_or_default();
        }
        let skip = thread.len().saturating_sub(self.config.roleplay_context_messages);
        thread[skip..]
            .iter()
            .map(|m| RoleplayLine {
                role: m.role.clone(),
                text: m.text.clone(),
            })
            .collect()
    }

    fn local_roleplay_reply(&mut self, scene: &Scene, user_text: &str) -> String {
        let scene_lines: Vec<&str> = scene
            .roleplay
            .as_ref()
            .map(|rp| rp.fallbacks.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let pool: &[&str] = if scene_lines.is_empty() {
            DEFAULT_FALLBACKS
        } else {
            &scene_lines
        };
        let pick = pool.choose(&mut self.rng).copied().unwrap_or_default();
        if user_text.is_empty() {
            return pick.to_string();
        }
        let quoted: String = user_text.chars().take(QUOTE_CHARS).collect();
        format!(
            "{}\n\nOn \"{}...\": I'll turn that into an action list.",
            pick, quoted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::game;
    use super::*;
    use crate::llm::HealthStatus;

    #[test]
    fn test_requires_roleplay_scene() {
        let mut game = game();
        game.go_to_scene("c1_kickoff");
        assert!(matches!(
            game.begin_roleplay("hello"),
            Err(SimError::Validation(_))
        ));
        game.go_to_scene("c2_insight");
        assert!(matches!(game.begin_roleplay("   "), Err(SimError::Validation(_))));
    }

    #[test]
    fn test_local_reply_when_offline() {
        let mut game = game();
        game.go_to_scene("c2_insight");
        assert!(game.begin_roleplay("Which users should we interview first?").unwrap().is_none());
        let thread = game.roleplay_thread();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].role, USER_ROLE);
        assert_eq!(thread[1].role, AI_ROLE);
        assert!(thread[1].text.contains("Which users should we i"));
    }

    #[test]
    fn test_ai_round_trip_sends_starter_then_window() {
        let mut game = game();
        game.set_ai_status(HealthStatus {
            ok: true,
            checked: true,
            ..Default::default()
        });
        game.go_to_scene("c2_insight");
        let starter = game
            .current_scene()
            .and_then(|s| s.roleplay.clone())
            .map(|rp| rp.starter)
            .unwrap_or_default();

        let request = game.begin_roleplay("first").unwrap().unwrap();
        assert_eq!(request.action, AiAction::RoleplayStep);
        assert_eq!(request.payload["thread"].as_array().map(Vec::len), Some(starter.len()));
        assert_eq!(request.payload["userText"], "first");
        game.apply_roleplay(
            "first",
            Some(AiResult {
                text: String::new(),
                json: Some(json!({"reply": "Sounds good", "next_actions": ["book 5 calls"]})),
            }),
        )
        .unwrap();

        for i in 0..4 {
            let msg = format!("message {}", i);
            game.begin_roleplay(&msg).unwrap();
            game.apply_roleplay(&msg, None).unwrap();
        }
        assert_eq!(game.roleplay_thread().len(), 10);
        assert!(game.roleplay_thread()[1].text.contains("Next steps: book 5 calls"));

        let request = game.begin_roleplay("last").unwrap().unwrap();
        assert_eq!(request.payload["thread"].as_array().map(Vec::len), Some(6));
        assert_eq!(game.state().ui.error, None);
    }
}

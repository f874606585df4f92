use std::cell::Cell;

use tracing::debug;

use crate::client::editor::EditorSurface;
use crate::models::{
    ClientMessage, EditDelta, EditMessage, Language, ServerMessage,
};
use crate::utils::ScopeGuard;

/// Client-side view of one room, kept consistent by applying the server's
/// forwarded messages to the attached editor surface.
///
/// While a remote mutation is being applied, the editor's change events must
/// not be re-emitted as local edits. That suppression is a transient mode
/// entered immediately before the single apply call and dropped immediately
/// after; it is never held across an await.
pub struct ClientReplica {
    room: String,
    language: Language,
    output: Vec<String>,
    applying_remote: Cell<bool>,
}

impl ClientReplica {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            language: Language::default(),
            output: Vec::new(),
            applying_remote: Cell::new(false),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Whether a locally observed editor change should be sent to the server.
    /// False exactly while a remote mutation is being applied.
    pub fn should_emit(&self) -> bool {
        !self.applying_remote.get()
    }

    /// Enter the "applying remote edit" mode for the current scope.
    pub fn remote_apply_scope(&self) -> ScopeGuard<impl FnOnce() + '_> {
        self.applying_remote.set(true);
        ScopeGuard::new(|| self.applying_remote.set(false))
    }

    /// Merge one forwarded server message into local state.
    ///
    /// Deltas are preferred; the accompanying full content is used only when
    /// the delta is missing, malformed, or does not fit the local buffer.
    pub fn apply_remote<E: EditorSurface>(&mut self, editor: &mut E, msg: &ServerMessage) {
        match msg {
            ServerMessage::Sync(sync) => {
                self.language = sync.language;
                self.output = sync.output.clone();
                let guard = self.remote_apply_scope();
                editor.replace_all(&sync.content);
                drop(guard);
            }
            ServerMessage::Edit(forward) => {
                let delta = forward.delta.as_ref().and_then(EditDelta::from_wire);
                let guard = self.remote_apply_scope();
                match delta {
                    Some(delta) => {
                        if !editor.apply_delta(&delta) {
                            debug!("Delta did not fit local buffer, replacing content");
                            editor.replace_all(&forward.content);
                        }
                    }
                    None => editor.replace_all(&forward.content),
                }
                drop(guard);
            }
            ServerMessage::Language(forward) => {
                self.language = forward.language;
            }
            ServerMessage::Output(forward) => {
                self.output = forward.output.clone();
            }
            // Membership and signaling messages carry no document state; the
            // surrounding application layer reacts to them.
            _ => {}
        }
    }

    /// Turn a locally observed edit into a wire message, unless it is the
    /// echo of a remote mutation currently being applied.
    pub fn emit_local_edit<E: EditorSurface>(
        &self,
        editor: &E,
        delta: Option<EditDelta>,
    ) -> Option<ClientMessage> {
        if !self.should_emit() {
            return None;
        }
        Some(ClientMessage::Edit(EditMessage {
            room: self.room.clone(),
            delta: delta.and_then(|d| serde_json::to_value(d).ok()),
            content: editor.content(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::editor::PlainTextBuffer;
    use crate::models::{CursorPosition, EditForward, LanguageForward, OutputForward, SyncMessage};
    use serde_json::json;

    fn forwarded_edit(delta: Option<serde_json::Value>, content: &str) -> ServerMessage {
        ServerMessage::Edit(EditForward {
            delta,
            content: content.to_string(),
        })
    }

    #[test]
    fn sync_replaces_everything() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("stale");
        replica.apply_remote(
            &mut editor,
            &ServerMessage::Sync(SyncMessage {
                content: "print(1)\n".to_string(),
                language: Language::Python,
                output: vec!["1".to_string()],
            }),
        );
        assert_eq!(editor.content(), "print(1)\n");
        assert_eq!(replica.language(), Language::Python);
        assert_eq!(replica.output(), ["1".to_string()]);
    }

    #[test]
    fn delta_is_preferred_over_full_content() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("hello world");
        let delta = json!({
            "start": {"row": 0, "column": 0},
            "end": {"row": 0, "column": 5},
            "text": "goodbye"
        });
        replica.apply_remote(&mut editor, &forwarded_edit(Some(delta), "goodbye world"));
        assert_eq!(editor.content(), "goodbye world");
    }

    #[test]
    fn missing_delta_falls_back_to_full_content() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("old");
        replica.apply_remote(&mut editor, &forwarded_edit(None, "new"));
        assert_eq!(editor.content(), "new");
    }

    #[test]
    fn malformed_delta_falls_back_to_full_content() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("old");
        replica.apply_remote(
            &mut editor,
            &forwarded_edit(Some(json!({"nope": 1})), "new"),
        );
        assert_eq!(editor.content(), "new");
    }

    #[test]
    fn out_of_range_delta_falls_back_to_full_content() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("ab");
        let delta = json!({
            "start": {"row": 9, "column": 0},
            "end": {"row": 9, "column": 1},
            "text": "x"
        });
        replica.apply_remote(&mut editor, &forwarded_edit(Some(delta), "resolved"));
        assert_eq!(editor.content(), "resolved");
    }

    #[test]
    fn suppression_is_scoped_to_the_apply() {
        let replica = ClientReplica::new("abc123");
        assert!(replica.should_emit());
        {
            let _guard = replica.remote_apply_scope();
            assert!(!replica.should_emit());
        }
        assert!(replica.should_emit());
    }

    #[test]
    fn suppressed_local_edit_is_not_emitted() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("");
        replica.apply_remote(&mut editor, &forwarded_edit(None, "remote"));

        // After the apply returns, emission works again.
        let msg = replica.emit_local_edit(&editor, None).unwrap();
        match msg {
            ClientMessage::Edit(edit) => {
                assert_eq!(edit.room, "abc123");
                assert_eq!(edit.content, "remote");
            }
            other => panic!("unexpected message: {other:?}"),
        }

        // During the apply it must not.
        let guard = replica.remote_apply_scope();
        assert!(replica.emit_local_edit(&editor, None).is_none());
        drop(guard);
    }

    #[test]
    fn local_edit_carries_delta_and_content() {
        let replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("hello");
        let delta = EditDelta {
            start: CursorPosition { row: 0, column: 5 },
            end: CursorPosition { row: 0, column: 5 },
            text: "!".to_string(),
        };
        editor.apply_delta(&delta);
        let msg = replica.emit_local_edit(&editor, Some(delta)).unwrap();
        match msg {
            ClientMessage::Edit(edit) => {
                assert!(edit.delta.is_some());
                assert_eq!(edit.content, "hello!");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn language_and_output_forwards_update_state() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("keep");
        replica.apply_remote(
            &mut editor,
            &ServerMessage::Language(LanguageForward {
                language: Language::Java,
            }),
        );
        replica.apply_remote(
            &mut editor,
            &ServerMessage::Output(OutputForward {
                output: vec!["out".to_string()],
            }),
        );
        assert_eq!(replica.language(), Language::Java);
        assert_eq!(replica.output(), ["out".to_string()]);
        // Neither forward touches the buffer.
        assert_eq!(editor.content(), "keep");
    }

    #[test]
    fn clearing_output_twice_converges() {
        let mut replica = ClientReplica::new("abc123");
        let mut editor = PlainTextBuffer::new("");
        let clear = ServerMessage::Output(OutputForward { output: Vec::new() });
        replica.apply_remote(&mut editor, &clear);
        replica.apply_remote(&mut editor, &clear);
        assert!(replica.output().is_empty());
    }
}

//! Append-only story session records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use novel_diver_error::{JsonError, SessionError, SessionErrorKind};
use serde::{Deserialize, Serialize};

/// One generated narrative segment between decision points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StoryChunk {
    /// Narrative text
    text: String,
    /// When the chunk was generated
    timestamp: DateTime<Utc>,
    /// Unique chunk identifier
    chunk_id: String,
    /// Options offered after this chunk (empty for a terminal chunk)
    #[serde(default)]
    decision_options: Vec<String>,
}

impl StoryChunk {
    /// Create a chunk stamped with the current time and a fresh identifier.
    pub fn new(text: impl Into<String>, decision_options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            chunk_id: format!("chunk_{}", uuid::Uuid::new_v4().simple()),
            decision_options,
        }
    }

    /// Whether the chunk offers options to choose from.
    pub fn awaits_choice(&self) -> bool {
        !self.decision_options.is_empty()
    }
}

/// A choice the player made after a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DecisionEntry {
    /// Text of the chosen option
    decision_text: String,
    /// Every option that was offered, in order
    options_available: Vec<String>,
    /// Zero-based index of the chosen option
    chosen_index: usize,
    /// When the decision was made
    timestamp: DateTime<Utc>,
}

/// Complete record of one story session.
///
/// Chunks and decisions are only ever appended. Decision `i` answers chunk `i`,
/// so there are never more decisions than chunks.
///
/// # Examples
///
/// ```
/// use novel_diver_core::StoryHistory;
///
/// let mut history = StoryHistory::new("demo", "Li Wei", "cultivation");
/// history.add_story_chunk("The sect gates loom above you.", vec!["Enter".into(), "Wait".into()]);
/// history.add_decision(0).unwrap();
///
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.decisions()[0].decision_text(), "Enter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StoryHistory {
    /// Session identifier
    session_id: String,
    /// Protagonist name
    character_name: String,
    /// World identifier
    #[serde(rename = "world_type")]
    world: String,
    /// Narrative segments in order
    #[serde(default)]
    story_chunks: Vec<StoryChunk>,
    /// Decisions in order
    #[serde(default)]
    decisions: Vec<DecisionEntry>,
    /// When the session started
    created_at: DateTime<Utc>,
    /// When the session last changed
    last_updated: DateTime<Utc>,
}

impl StoryHistory {
    /// Start an empty history.
    pub fn new(
        session_id: impl Into<String>,
        character_name: impl Into<String>,
        world: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            character_name: character_name.into(),
            world: world.into(),
            story_chunks: Vec::new(),
            decisions: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    /// Build a session identifier of the form `<name>_<YYYYmmdd_HHMMSS>`.
    pub fn new_session_id(character_name: &str) -> String {
        format!("{}_{}", character_name, Utc::now().format("%Y%m%d_%H%M%S"))
    }

    /// Append a narrative segment.
    pub fn add_story_chunk(
        &mut self,
        text: impl Into<String>,
        decision_options: Vec<String>,
    ) -> &StoryChunk {
        self.story_chunks.push(StoryChunk::new(text, decision_options));
        self.last_updated = Utc::now();
        tracing::debug!(
            session_id = %self.session_id,
            chunks = self.story_chunks.len(),
            "Appended story chunk"
        );
        &self.story_chunks[self.story_chunks.len() - 1]
    }

    /// Record the player's choice among the newest chunk's options.
    ///
    /// # Errors
    ///
    /// - `NoStory` if there are no chunks yet
    /// - `NoOptions` if the newest chunk offers nothing to choose
    /// - `InvalidChoice` if `chosen_index` is out of range
    /// - `DecisionPending` if the newest chunk already has a decision
    pub fn add_decision(&mut self, chosen_index: usize) -> Result<&DecisionEntry, SessionError> {
        if let Some(recorded) = self.pending_decision() {
            return Err(SessionError::new(SessionErrorKind::DecisionPending {
                recorded: recorded.chosen_index,
            }));
        }

        let chunk = self
            .latest_chunk()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoStory))?;
        let options = chunk.decision_options();
        if options.is_empty() {
            return Err(SessionError::new(SessionErrorKind::NoOptions));
        }
        let Some(decision_text) = options.get(chosen_index).cloned() else {
            return Err(SessionError::new(SessionErrorKind::InvalidChoice {
                index: chosen_index,
                available: options.len(),
            }));
        };

        let entry = DecisionEntry {
            decision_text,
            options_available: options.clone(),
            chosen_index,
            timestamp: Utc::now(),
        };
        self.decisions.push(entry);
        self.last_updated = Utc::now();
        tracing::debug!(
            session_id = %self.session_id,
            chosen_index,
            decisions = self.decisions.len(),
            "Recorded decision"
        );
        Ok(&self.decisions[self.decisions.len() - 1])
    }

    /// Decision recorded for the newest chunk whose continuation has not been generated.
    pub fn pending_decision(&self) -> Option<&DecisionEntry> {
        if !self.story_chunks.is_empty() && self.decisions.len() == self.story_chunks.len() {
            self.decisions.last()
        } else {
            None
        }
    }

    /// Most recently appended chunk.
    pub fn latest_chunk(&self) -> Option<&StoryChunk> {
        self.story_chunks.last()
    }

    /// Options offered by the newest chunk.
    pub fn current_options(&self) -> &[String] {
        self.latest_chunk()
            .map(|chunk| chunk.decision_options().as_slice())
            .unwrap_or(&[])
    }

    /// The whole story as chapters, each followed by the decision made after it.
    pub fn full_story_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.story_chunks.len() * 3);
        for (i, chunk) in self.story_chunks.iter().enumerate() {
            parts.push(format!("--- Chapter {} ---", i + 1));
            parts.push(chunk.text.clone());
            if let Some(decision) = self.decisions.get(i) {
                parts.push(format!("\n[Decision Made: {}]\n", decision.decision_text));
            }
        }
        parts.join("\n\n")
    }

    /// Text of the last `min(num_chunks, len)` chunks joined by blank lines.
    pub fn recent_context(&self, num_chunks: usize) -> String {
        let start = self.story_chunks.len().saturating_sub(num_chunks);
        self.story_chunks[start..]
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Recent context plus the last decision while the newest chunk is still unanswered.
    pub fn continuation_context(&self, num_chunks: usize) -> String {
        let context = self.recent_context(num_chunks);
        match self.decisions.last() {
            Some(last) if self.story_chunks.len() > self.decisions.len() => {
                format!("{}\n\n\n[Last Decision: {}]", context, last.decision_text)
            }
            _ => context,
        }
    }

    /// Number of story chunks.
    pub fn len(&self) -> usize {
        self.story_chunks.len()
    }

    /// True before the first chunk is appended.
    pub fn is_empty(&self) -> bool {
        self.story_chunks.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, JsonError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| JsonError::new(format!("Failed to serialize story history: {}", e)))
    }

    /// Deserialize from JSON, rejecting records that break the history invariants.
    pub fn from_json(json: &str) -> Result<Self, JsonError> {
        let history: Self = serde_json::from_str(json)
            .map_err(|e| JsonError::new(format!("Failed to parse story history: {}", e)))?;

        if history.decisions.len() > history.story_chunks.len() {
            return Err(JsonError::new(format!(
                "Story history has {} decisions but only {} chunks",
                history.decisions.len(),
                history.story_chunks.len()
            )));
        }
        if let Some(bad) = history
            .decisions
            .iter()
            .find(|d| d.chosen_index >= d.options_available.len())
        {
            return Err(JsonError::new(format!(
                "Decision index {} is outside its {} options",
                bad.chosen_index,
                bad.options_available.len()
            )));
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["North", "South", "East", "West"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn pending_decision_tracks_newest_chunk() {
        let mut history = StoryHistory::new("s", "Hero", "fantasy");
        history.add_story_chunk("One", options());
        assert!(history.pending_decision().is_none());

        history.add_decision(2).unwrap();
        assert_eq!(history.pending_decision().unwrap().chosen_index(), &2);

        history.add_story_chunk("Two", options());
        assert!(history.pending_decision().is_none());
    }

    #[test]
    fn chunk_ids_are_unique() {
        let a = StoryChunk::new("a", Vec::new());
        let b = StoryChunk::new("b", Vec::new());
        assert_ne!(a.chunk_id(), b.chunk_id());
        assert!(a.chunk_id().starts_with("chunk_"));
    }
}

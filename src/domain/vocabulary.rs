// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional mapping between tokens and dense indices.
//
//   token_to_idx: "H" → 3        idx_to_token: [.., .., .., "H"]
//
// Lifecycle:
//   1. Unfrozen — add_token() grows the mapping, assigning the
//      next free index in first-seen order.
//   2. Frozen   — the mapping is fixed; add_token() of a new
//      token fails, lookups of unknown tokens fail unless an
//      unknown token is configured.
//
// Special tokens are registered at construction in the fixed
// order mask, begin, end, unknown, so the mask always gets
// index 0 when present.
//
// Serialised form (JSON):
//   {
//     "token_to_idx":    {"<MASK>": 0, "^": 1, "_": 2, "H": 3, ...},
//     "mask_token":      "<MASK>",
//     "begin_seq_token": "^",
//     "end_seq_token":   "_",
//     "unk_token":       null,
//     "frozen":          true
//   }

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Padding token of sequence vocabularies.
pub const MASK_TOKEN: &str = "<MASK>";
/// Marks the start of every encoded surname.
pub const BEGIN_SEQ_TOKEN: &str = "^";
/// Marks the end of every encoded surname.
pub const END_SEQ_TOKEN: &str = "_";

/// Which reserved tokens a vocabulary carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub mask_token:      Option<String>,
    pub begin_seq_token: Option<String>,
    pub end_seq_token:   Option<String>,
    pub unk_token:       Option<String>,
}

impl SpecialTokens {
    /// No reserved tokens (label vocabularies).
    pub fn none() -> Self {
        Self::default()
    }

    /// Mask, begin and end markers without an unknown bucket.
    pub fn sequence() -> Self {
        Self {
            mask_token:      Some(MASK_TOKEN.to_string()),
            begin_seq_token: Some(BEGIN_SEQ_TOKEN.to_string()),
            end_seq_token:   Some(END_SEQ_TOKEN.to_string()),
            unk_token:       None,
        }
    }

    pub fn with_unk_token(mut self, token: impl Into<String>) -> Self {
        self.unk_token = Some(token.into());
        self
    }

    fn in_registration_order(&self) -> impl Iterator<Item = &str> {
        [
            &self.mask_token,
            &self.begin_seq_token,
            &self.end_seq_token,
            &self.unk_token,
        ]
        .into_iter()
        .filter_map(|t| t.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyContents", into = "VocabularyContents")]
pub struct Vocabulary {
    token_to_idx: HashMap<String, usize>,
    idx_to_token: Vec<String>,
    special:      SpecialTokens,
    frozen:       bool,
}

impl Vocabulary {
    /// Empty, unfrozen vocabulary holding only the special tokens.
    pub fn new(special: SpecialTokens) -> Self {
        let mut vocab = Self {
            token_to_idx: HashMap::new(),
            idx_to_token: Vec::new(),
            special:      SpecialTokens::none(),
            frozen:       false,
        };
        for token in special.in_registration_order() {
            if !vocab.contains(token) {
                vocab.insert(token);
            }
        }
        vocab.special = special;
        vocab
    }

    /// Register a token, returning its index. Known tokens keep
    /// their index in either mode.
    pub fn add_token(&mut self, token: &str) -> Result<usize, PipelineError> {
        if let Some(&idx) = self.token_to_idx.get(token) {
            return Ok(idx);
        }
        if self.frozen {
            return Err(PipelineError::FrozenVocabulary(token.to_string()));
        }
        Ok(self.insert(token))
    }

    pub fn add_many<'a, I>(&mut self, tokens: I) -> Result<Vec<usize>, PipelineError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens.into_iter().map(|t| self.add_token(t)).collect()
    }

    fn insert(&mut self, token: &str) -> usize {
        let idx = self.idx_to_token.len();
        self.token_to_idx.insert(token.to_string(), idx);
        self.idx_to_token.push(token.to_string());
        idx
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Index of `token`, falling back to the unknown token when
    /// one is configured.
    pub fn lookup_token(&self, token: &str) -> Result<usize, PipelineError> {
        match self.token_to_idx.get(token) {
            Some(&idx) => Ok(idx),
            None => self
                .unk_index()
                .ok_or_else(|| PipelineError::UnknownToken(token.to_string())),
        }
    }

    pub fn lookup_index(&self, index: usize) -> Result<&str, PipelineError> {
        self.idx_to_token
            .get(index)
            .map(String::as_str)
            .ok_or(PipelineError::UnknownIndex { index, len: self.len() })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_idx.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.idx_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx_to_token.is_empty()
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.idx_to_token.iter().map(String::as_str)
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special
    }

    pub fn mask_index(&self) -> Option<usize> {
        self.special_index(&self.special.mask_token)
    }

    pub fn begin_seq_index(&self) -> Option<usize> {
        self.special_index(&self.special.begin_seq_token)
    }

    pub fn end_seq_index(&self) -> Option<usize> {
        self.special_index(&self.special.end_seq_token)
    }

    pub fn unk_index(&self) -> Option<usize> {
        self.special_index(&self.special.unk_token)
    }

    fn special_index(&self, token: &Option<String>) -> Option<usize> {
        token.as_deref().and_then(|t| self.token_to_idx.get(t).copied())
    }
}

// ─── Serialised contents ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyContents {
    pub token_to_idx:    BTreeMap<String, usize>,
    pub mask_token:      Option<String>,
    pub begin_seq_token: Option<String>,
    pub end_seq_token:   Option<String>,
    pub unk_token:       Option<String>,
    pub frozen:          bool,
}

impl From<Vocabulary> for VocabularyContents {
    fn from(v: Vocabulary) -> Self {
        Self {
            token_to_idx:    v.token_to_idx.into_iter().collect(),
            mask_token:      v.special.mask_token,
            begin_seq_token: v.special.begin_seq_token,
            end_seq_token:   v.special.end_seq_token,
            unk_token:       v.special.unk_token,
            frozen:          v.frozen,
        }
    }
}

impl TryFrom<VocabularyContents> for Vocabulary {
    type Error = PipelineError;

    fn try_from(c: VocabularyContents) -> Result<Self, Self::Error> {
        let len = c.token_to_idx.len();
        let mut slots: Vec<Option<String>> = vec![None; len];
        for (token, &idx) in &c.token_to_idx {
            let slot = slots.get_mut(idx).ok_or_else(|| {
                PipelineError::MalformedVocabulary(format!(
                    "index {idx} of {token:?} is outside 0..{len}"
                ))
            })?;
            if let Some(other) = slot.replace(token.clone()) {
                return Err(PipelineError::MalformedVocabulary(format!(
                    "index {idx} assigned to both {other:?} and {token:?}"
                )));
            }
        }
        // BTreeMap keys are unique, so `len` entries without
        // collisions fill every slot exactly once.
        let idx_to_token: Vec<String> = slots.into_iter().flatten().collect();

        let special = SpecialTokens {
            mask_token:      c.mask_token,
            begin_seq_token: c.begin_seq_token,
            end_seq_token:   c.end_seq_token,
            unk_token:       c.unk_token,
        };
        for token in special.in_registration_order() {
            if !c.token_to_idx.contains_key(token) {
                return Err(PipelineError::MalformedVocabulary(format!(
                    "special token {token:?} has no index"
                )));
            }
        }
        if let Some(mask) = special.mask_token.as_deref() {
            if c.token_to_idx.get(mask) != Some(&0) {
                return Err(PipelineError::MalformedVocabulary(format!(
                    "mask token {mask:?} must have index 0"
                )));
            }
        }

        Ok(Self {
            token_to_idx: c.token_to_idx.into_iter().collect(),
            idx_to_token,
            special,
            frozen: c.frozen,
        })
    }
}

//! Binding index - ordered in-memory copy of the binding table
//!
//! Insertion order is significant: when several bindings match, the first
//! inserted one wins.

use rolebot_core::{Binding, Snowflake};

/// Ordered set of bindings. Only the binding manager mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingIndex {
    bindings: Vec<Binding>,
}

impl BindingIndex {
    /// Build an index from bindings in stored order
    pub fn from_bindings(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// All bindings, in insertion order
    #[inline]
    pub fn all(&self) -> &[Binding] {
        &self.bindings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn append(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    /// Remove every binding matching `predicate`, returning them in order
    pub(crate) fn remove_where<P>(&mut self, predicate: P) -> Vec<Binding>
    where
        P: FnMut(&Binding) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bindings)
            .into_iter()
            .partition(predicate);
        self.bindings = kept;
        removed
    }

    /// First inserted binding matching `predicate`
    pub fn first_where<P>(&self, mut predicate: P) -> Option<&Binding>
    where
        P: FnMut(&Binding) -> bool,
    {
        self.bindings.iter().find(|&b| predicate(b))
    }

    /// Binding triggered by `emoji` on `message_id`
    pub fn find(&self, message_id: Snowflake, emoji: &str) -> Option<&Binding> {
        self.first_where(|b| b.matches(message_id, emoji))
    }

    /// All bindings granting `role_id` in `guild_id`
    pub fn for_role(&self, guild_id: Snowflake, role_id: Snowflake) -> Vec<Binding> {
        self.bindings
            .iter()
            .filter(|b| b.grants(guild_id, role_id))
            .cloned()
            .collect()
    }
}

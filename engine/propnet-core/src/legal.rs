//! Legal sets and joint moves.

/// Legal choices of one role in the current position.
///
/// Choices are legal indices within the role's legal range, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalState {
    choices: Vec<u32>,
}

impl LegalState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            choices: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.choices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// The `index`-th legal choice. Panics if `index >= count()`.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.choices[index]
    }

    pub fn contains(&self, choice: u32) -> bool {
        self.choices.binary_search(&choice).is_ok()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.choices
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.choices.iter().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.choices.clear();
    }

    pub(crate) fn push(&mut self, choice: u32) {
        self.choices.push(choice);
    }
}

/// One legal choice per role, applied together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JointMove {
    choices: Vec<u32>,
}

impl JointMove {
    pub fn new(role_count: usize) -> Self {
        Self {
            choices: vec![0; role_count],
        }
    }

    pub fn from_choices(choices: Vec<u32>) -> Self {
        Self { choices }
    }

    #[inline]
    pub fn get(&self, role: usize) -> u32 {
        self.choices[role]
    }

    #[inline]
    pub fn set(&mut self, role: usize, choice: u32) {
        self.choices[role] = choice;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.choices
    }
}

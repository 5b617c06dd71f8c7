//! Registry of user functions promoted to invocable commands.

/// A named script function registered as an independently triggerable action.
/// The display name is the function identifier with underscores rendered as
/// spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub name: String,
}

impl Command {
    pub fn from_fn_name(fn_name: &str) -> Self {
        Self {
            id: fn_name.to_string(),
            name: fn_name.replace('_', " "),
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the function called `fn_name`. Re-registering the same id
    /// replaces the earlier entry.
    pub fn register(&mut self, fn_name: &str) -> Command {
        let command = Command::from_fn_name(fn_name);
        match self.commands.iter_mut().find(|c| c.id == command.id) {
            Some(existing) => *existing = command.clone(),
            None => self.commands.push(command.clone()),
        }
        command
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

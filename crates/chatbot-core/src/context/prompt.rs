use crate::constants::prompts;
use crate::llm::Turn;

/// Everything the model sees for one turn. Built fresh each time.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub user_input: String,
}

impl PromptRequest {
    /// System instruction first, then history in append order, then the new
    /// user turn last.
    pub fn messages(&self) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Turn::system(&self.system_instruction));
        messages.extend(self.history.iter().cloned());
        messages.push(Turn::user(&self.user_input));
        messages
    }
}

/// Combines a fixed system instruction with history and new input.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_instruction: String,
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self {
            system_instruction: prompts::SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn assemble(&self, history: &[Turn], user_input: &str) -> PromptRequest {
        PromptRequest {
            system_instruction: self.system_instruction.clone(),
            history: history.to_vec(),
            user_input: user_input.to_string(),
        }
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn empty_history_yields_system_then_user() {
        let assembler = PromptAssembler::new().with_system_instruction("be brief");
        let messages = assembler.assemble(&[], "hello").messages();

        assert_eq!(messages, vec![Turn::system("be brief"), Turn::user("hello")]);
    }

    #[test]
    fn history_sits_between_system_and_new_input() {
        let assembler = PromptAssembler::new().with_system_instruction("sys");
        let history = vec![
            Turn::user("q1"),
            Turn::assistant("a1"),
            Turn::user("q2"),
            Turn::assistant("a2"),
        ];
        let messages = assembler.assemble(&history, "q3").messages();

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
            ]
        );
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "q1", "a1", "q2", "a2", "q3"]);
    }

    #[test]
    fn default_instruction_is_the_chat_agent_prompt() {
        let assembler = PromptAssembler::default();
        assert_eq!(assembler.system_instruction(), prompts::SYSTEM_INSTRUCTION);
    }

    #[test]
    fn assemble_does_not_alias_history() {
        let assembler = PromptAssembler::new();
        let history = vec![Turn::user("q1"), Turn::assistant("a1")];
        let request = assembler.assemble(&history, "q2");
        assert_eq!(request.history, history);
        assert_eq!(request.user_input, "q2");
    }
}

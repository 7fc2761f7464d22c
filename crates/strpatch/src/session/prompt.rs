use std::io;

/// Line-oriented operator interaction used by the replacement session.
pub trait Prompter {
    /// Show `message` and read one raw line, line ending included. Returns
    /// `Ok(None)` once input is closed.
    fn prompt_line(&mut self, message: &str) -> io::Result<Option<Vec<u8>>>;

    fn display_message(&mut self, message: &str);

    fn display_warning(&mut self, message: &str);

    fn display_success(&mut self, message: &str) {
        self.display_message(message);
    }
}

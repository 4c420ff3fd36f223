/// One replicated command decoded from the monitor feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command name, the first decoded token. Empty when the line held
    /// no tokens at all.
    pub name: String,
    /// Remaining tokens in feed order. Binary-safe, not necessarily
    /// valid text.
    pub args: Vec<Vec<u8>>,
    /// The post-prefix line text, kept for diagnostics.
    pub raw: String,
}

impl Command {
    /// A command without a name cannot be forwarded and must be dropped.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        let cmd = Command {
            name: "SET".to_string(),
            args: vec![b"k".to_vec(), b"v".to_vec()],
            raw: r#""SET" "k" "v""#.to_string(),
        };
        assert!(cmd.is_valid());

        let empty = Command {
            name: String::new(),
            args: Vec::new(),
            raw: String::new(),
        };
        assert!(!empty.is_valid());
    }
}

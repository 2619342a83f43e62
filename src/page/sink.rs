use std::cell::RefCell;
use std::rc::Rc;

/// Log target used by [`ConsoleSink`]
pub const CONSOLE_TARGET: &str = "inbox_inspector::console";

/// Destination for console lines emitted by click handling
pub trait LineSink {
    fn emit(&self, line: &str);
}

impl<T: LineSink + ?Sized> LineSink for Rc<T> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

/// Writes lines through the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LineSink for ConsoleSink {
    fn emit(&self, line: &str) {
        log::info!(target: CONSOLE_TARGET, "{}", line);
    }
}

/// Writes lines to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Drain the buffer, returning its lines
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl LineSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();

        clone.emit("Sender: Alice <alice@x.com>");
        sink.emit("Recipient: Bob <bob@x.com>");

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.lines(),
            vec!["Sender: Alice <alice@x.com>", "Recipient: Bob <bob@x.com>"]
        );
    }

    #[test]
    fn test_memory_sink_take() {
        let sink = MemorySink::new();
        sink.emit("one");
        assert_eq!(sink.take(), vec!["one"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_rc_dyn_sink() {
        let memory = MemorySink::new();
        let shared: Rc<dyn LineSink> = Rc::new(memory.clone());
        shared.emit("line");
        assert_eq!(memory.lines(), vec!["line"]);
    }

    #[test]
    fn test_console_sink_does_not_panic_without_logger() {
        ConsoleSink.emit("Click target: <div>");
    }
}

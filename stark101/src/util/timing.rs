use std::time::Duration;
#[cfg(feature = "timing")]
use std::time::Instant;

use log::Level;
#[cfg(feature = "timing")]
use log::log;

/// Nested wall-clock scopes around the stages of a proof, logged as an indented tree.
#[cfg(feature = "timing")]
pub struct TimingTree {
    name: String,
    /// The level at which this scope and its children are logged.
    level: Level,
    enter_time: Instant,
    /// `None` while the scope is open.
    exit_time: Option<Instant>,
    children: Vec<TimingTree>,
}

/// Without the `timing` feature every scope is a no-op.
#[cfg(not(feature = "timing"))]
pub struct TimingTree(Level);

impl Default for TimingTree {
    fn default() -> Self {
        TimingTree::new("prove", Level::Debug)
    }
}

#[cfg(feature = "timing")]
impl TimingTree {
    pub fn new(root_name: &str, level: Level) -> Self {
        Self {
            name: root_name.to_string(),
            level,
            enter_time: Instant::now(),
            exit_time: None,
            children: vec![],
        }
    }

    fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// The currently open scopes, outermost first, joined by `" > "`.
    pub fn open_stack(&self) -> String {
        let mut stack = Vec::new();
        let mut scope = Some(self);
        while let Some(s) = scope.filter(|s| s.is_open()) {
            stack.push(s.name.as_str());
            scope = s.children.last();
        }
        stack.join(" > ")
    }

    /// Opens `ctx` inside the deepest open scope. A child is never logged at a more verbose level
    /// than its parent.
    pub fn push(&mut self, ctx: &str, level: Level) {
        assert!(self.is_open(), "Scope {} is already closed", self.name);
        let level = level.max(self.level);

        match self.children.last_mut() {
            Some(last_child) if last_child.is_open() => last_child.push(ctx, level),
            _ => self.children.push(TimingTree::new(ctx, level)),
        }
    }

    /// Closes the deepest open scope.
    pub fn pop(&mut self) {
        assert!(self.is_open(), "Scope {} is already closed", self.name);

        match self.children.last_mut() {
            Some(last_child) if last_child.is_open() => last_child.pop(),
            _ => self.exit_time = Some(Instant::now()),
        }
    }

    pub fn duration(&self) -> Duration {
        self.exit_time
            .unwrap_or_else(Instant::now)
            .duration_since(self.enter_time)
    }

    /// Names of the direct child scopes, in the order they were opened.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Drops every scope shorter than `min_delta`.
    pub fn filter(&self, min_delta: Duration) -> Self {
        Self {
            name: self.name.clone(),
            level: self.level,
            enter_time: self.enter_time,
            exit_time: self.exit_time,
            children: self
                .children
                .iter()
                .filter(|c| c.duration() >= min_delta)
                .map(|c| c.filter(min_delta))
                .collect(),
        }
    }

    pub fn print(&self) {
        self.print_at_depth(0);
    }

    fn print_at_depth(&self, depth: usize) {
        log!(
            self.level,
            "{}{:.4}s to {}",
            "| ".repeat(depth),
            self.duration().as_secs_f64(),
            self.name
        );
        for child in &self.children {
            child.print_at_depth(depth + 1);
        }
    }
}

#[cfg(not(feature = "timing"))]
impl TimingTree {
    pub fn new(_root_name: &str, level: Level) -> Self {
        Self(level)
    }

    pub fn open_stack(&self) -> String {
        String::new()
    }

    pub fn push(&mut self, _ctx: &str, _level: Level) {}

    pub fn pop(&mut self) {}

    pub fn child_names(&self) -> Vec<&str> {
        Vec::new()
    }

    pub fn filter(&self, _min_delta: Duration) -> Self {
        Self(self.0)
    }

    pub fn print(&self) {}
}

/// Evaluates `$exp` inside a named scope of `$timing_tree`, logged at `Debug` unless a level is
/// given.
#[macro_export]
macro_rules! timed {
    ($timing_tree:expr, $level:expr, $ctx:expr, $exp:expr) => {{
        $timing_tree.push($ctx, $level);
        let res = $exp;
        $timing_tree.pop();
        res
    }};
    ($timing_tree:expr, $ctx:expr, $exp:expr) => {{
        $timing_tree.push($ctx, log::Level::Debug);
        let res = $exp;
        $timing_tree.pop();
        res
    }};
}

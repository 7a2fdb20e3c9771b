//! Token window planning
//!
//! Windows are half-open token ranges. Consecutive windows overlap by exactly
//! `stride` tokens so that an entity straddling one window's edge is seen
//! whole by its neighbour:
//!
//! ```text
//! tokens:  0 ............................................. 600
//! window:  [0 ........................ 510)
//! window:                   [382 ..................... 600)
//!                           └─ stride ─┘
//! ```

use crate::error::{CoreError, Result};
use std::ops::Range;

/// A half-open range of token indices submitted to the model in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenWindow {
    /// First token index (inclusive)
    pub start: usize,
    /// Last token index (exclusive)
    pub end: usize,
}

impl TokenWindow {
    /// Create a window over `[start, end)`
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens in this window
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if empty
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Token range
    pub const fn token_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Plans overlapping token windows for a fixed window size and stride
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlanner {
    window_size: usize,
    stride: usize,
}

impl WindowPlanner {
    /// Create a planner.
    ///
    /// Fails with [`CoreError::InvalidConfiguration`] when `window_size` is
    /// zero or `stride >= window_size` (no forward progress).
    pub fn new(window_size: usize, stride: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(CoreError::invalid_configuration(
                "window size must be > 0",
            ));
        }
        if stride >= window_size {
            return Err(CoreError::invalid_configuration(format!(
                "stride ({stride}) must be < window size ({window_size})"
            )));
        }
        Ok(Self {
            window_size,
            stride,
        })
    }

    /// Create a planner from a model's token limit.
    ///
    /// `special_tokens` (e.g. `[CLS]` and `[SEP]`) are subtracted from
    /// `max_tokens` to get the per-window budget.
    pub fn for_model(max_tokens: usize, special_tokens: usize, stride: usize) -> Result<Self> {
        let window_size = match max_tokens.checked_sub(special_tokens) {
            Some(size) if size > 0 => size,
            _ => {
                return Err(CoreError::invalid_configuration(format!(
                    "max_tokens={max_tokens} too small for special tokens={special_tokens}"
                )))
            }
        };
        if stride >= window_size {
            return Err(CoreError::invalid_configuration(format!(
                "stride_tokens ({stride}) must be < max_tokens - special tokens ({window_size})"
            )));
        }
        Self::new(window_size, stride)
    }

    /// Tokens per window
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Overlap between consecutive windows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Iterate the windows covering `total_tokens` tokens
    pub fn windows(&self, total_tokens: usize) -> Windows {
        Windows {
            next_start: 0,
            total: total_tokens,
            window_size: self.window_size,
            stride: self.stride,
            done: total_tokens == 0,
        }
    }

    /// Collect the windows covering `total_tokens` tokens
    pub fn plan(&self, total_tokens: usize) -> Vec<TokenWindow> {
        self.windows(total_tokens).collect()
    }

    /// Upper bound on the number of windows for `total_tokens`
    pub fn max_windows(&self, total_tokens: usize) -> usize {
        total_tokens.div_ceil(self.window_size - self.stride)
    }
}

/// Iterator over planned windows
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: usize,
    total: usize,
    window_size: usize,
    stride: usize,
    done: bool,
}

impl Iterator for Windows {
    type Item = TokenWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.next_start;
        let end = start.saturating_add(self.window_size).min(self.total);
        if end == self.total {
            self.done = true;
        } else {
            // stride < window_size, so this always moves forward
            self.next_start = end - self.stride;
        }

        Some(TokenWindow::new(start, end))
    }
}

/// Plan windows in one call
pub fn plan_windows(total_tokens: usize, window_size: usize, stride: usize) -> Result<Vec<TokenWindow>> {
    Ok(WindowPlanner::new(window_size, stride)?.plan(total_tokens))
}

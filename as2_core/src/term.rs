//! Minimal ANSI terminal control sequences used by console logging and error display.

#[allow(non_camel_case_types)]
pub struct Term;

impl Term {
    pub const RESET:                   &'static str = "\x1b[0m";
    pub const BOLD:                    &'static str = "\x1b[1m";

    pub const FORE_RED:                &'static str = "\x1b[31m";
    pub const FORE_GREEN:               &'static str = "\x1b[32m";
    pub const FORE_YELLOW:              &'static str = "\x1b[33m";
    pub const FORE_BLUE:                &'static str = "\x1b[34m";
    pub const FORE_MAGENTA:             &'static str = "\x1b[35m";
    pub const FORE_CYAN:                &'static str = "\x1b[36m";

    pub const SET_BRIGHT_FORE_RED:      &'static str = "\x1b[91m";
    pub const SET_BRIGHT_FORE_GREEN:    &'static str = "\x1b[92m";
    pub const SET_BRIGHT_FORE_YELLOW:   &'static str = "\x1b[93m";
    pub const SET_BRIGHT_FORE_BLUE:     &'static str = "\x1b[94m";
    pub const SET_BRIGHT_FORE_MAGENTA:  &'static str = "\x1b[95m";
    pub const SET_BRIGHT_FORE_CYAN:     &'static str = "\x1b[96m";
    pub const SET_BRIGHT_FORE_BLACK:    &'static str = "\x1b[90m";

    pub const BACK_YELLOW:              &'static str = "\x1b[43m";
}

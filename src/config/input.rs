//! Input and open configuration options for fbrowse
//!
//! [Keys] holds the terminal host bindings from the `[keys]` table, written in
//! the usual key syntax ("Enter", "Ctrl+o", "Alt+Enter", "<c-t>").
//! [Open] holds the `[open]` table: the open command template and print-path mode.

use crate::core::proc::DEFAULT_OPEN_TEMPLATE;

use serde::Deserialize;

/// Key bindings of all host actions
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keys {
    select: Vec<String>,
    custom_command: Vec<String>,
    custom_input: Vec<String>,
    next: Vec<String>,
    previous: Vec<String>,
    cancel: Vec<String>,
    up: Vec<String>,
    down: Vec<String>,
}

/// How a chosen file is opened
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Open {
    cmd: String,
    print_path: bool,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    select,
    custom_command,
    custom_input,
    next,
    previous,
    cancel,
    up,
    down,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            select: vec!["Enter".into()],
            custom_command: vec!["Alt+Enter".into(), "Ctrl+o".into()],
            custom_input: vec!["Ctrl+Enter".into(), "Ctrl+t".into()],
            next: vec!["Shift+Right".into()],
            previous: vec!["Shift+Left".into()],
            cancel: vec!["Esc".into(), "Ctrl+c".into()],
            up: vec!["Up".into(), "Ctrl+k".into()],
            down: vec!["Down".into(), "Ctrl+j".into()],
        }
    }
}

impl Open {
    #[inline]
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    #[inline]
    pub fn print_path(&self) -> bool {
        self.print_path
    }

    pub(crate) fn set_cmd(&mut self, cmd: String) {
        self.cmd = cmd;
    }

    pub(crate) fn set_print_path(&mut self, enabled: bool) {
        self.print_path = enabled;
    }
}

impl Default for Open {
    fn default() -> Self {
        Open {
            cmd: DEFAULT_OPEN_TEMPLATE.to_string(),
            print_path: false,
        }
    }
}

//! Post-send/post-receive shell hooks, fired only after persistence; they are launched
//! asynchronously and their success/failure does not affect message state.
//!
//! Shells out to an external command via `std::process::Command` and checks its exit status
//! without letting a failure there propagate into the caller's own result.

use as2_core::prelude::*;
use as2_store::model::Message;

use std::process::Command;

/// Expand `{message_id}`, `{org}`, `{partner}`, `{file}` placeholders in a partner's command
/// template (`as2_profile::Partner::post_send_command`/`post_receive_command`).
fn expand(template: &str, message: &Message, file_path: &str) -> String {
    template
        .replace("{message_id}", &message.message_id)
        .replace("{org}", &message.org)
        .replace("{partner}", &message.partner)
        .replace("{file}", file_path)
}

/// Run one hook on a detached thread; a missing `template` is a no-op. Never called before the
/// triggering Message/MDN record has already been persisted.
pub fn run(template: Option<String>, message: Message, file_path: String) {
    let template = match template {
        Some(t) => t,
        None => return,
    };
    std::thread::spawn(move || {
        let command_line = expand(&template, &message, &file_path);
        let mut parts = command_line.split_whitespace();
        let program = match parts.next() {
            Some(p) => p,
            None => return,
        };
        match Command::new(program).args(parts).output() {
            Ok(output) if output.status.success() => {
                debug!("Hook '{}' for message '{}' completed.", command_line, message.message_id);
            },
            Ok(output) => {
                warn!("Hook '{}' for message '{}' exited with status {:?}.",
                    command_line, message.message_id, output.status.code());
            },
            Err(e) => {
                warn!("Hook '{}' for message '{}' could not be started: {}.",
                    command_line, message.message_id, e);
            },
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use as2_store::model::Direction;
    use std::time::SystemTime;

    #[test]
    fn expand_substitutes_known_placeholders() {
        let message = Message::new("msg-1", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        let out = expand("notify --id={message_id} --org={org} --from={partner} --path={file}", &message, "/tmp/doc.edi");
        assert_eq!(out, "notify --id=msg-1 --org=AcmeOrg --from=BigCo --path=/tmp/doc.edi");
    }

    #[test]
    fn no_template_is_a_no_op() {
        let message = Message::new("msg-2", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        run(None, message, String::new());
    }
}

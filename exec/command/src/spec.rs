//! Static command definitions.

use std::borrow::Cow;

use explorer_error::ExecError;
use explorer_error::Result;

/// Immutable description of one external command.
///
/// Specs are defined once in [`crate::registry`] and never mutated. The
/// capability flags decide which console an invocation must run on and how
/// its failures are classified.
#[derive(Debug)]
pub struct CommandSpec {
    /// Stable identifier, used in errors and to key result parsers.
    pub id: &'static str,
    /// Command-line template with positional `{0}`..`{n}` placeholders.
    pub template: &'static str,
    /// Whether the command must run on the elevated console.
    pub requires_elevation: bool,
    /// Whether stdout is structured enough to parse, and meaningful as a
    /// partial result when the command is denied or cancelled midway.
    pub structured_output: bool,
    /// Index of the bound argument that names the written target, for
    /// commands that modify the filesystem. Used to resolve the mount
    /// point behind a "Read-only file system" error.
    pub writable_arg: Option<usize>,
}

impl CommandSpec {
    /// Number of distinct positional placeholders in the template.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        while self.template.contains(&format!("{{{count}}}")) {
            count += 1;
        }
        count
    }

    /// Substitutes each placeholder with its quoted argument.
    ///
    /// Every argument is quoted so shell metacharacters in paths cannot be
    /// interpreted as additional commands. Fails with
    /// [`ExecError::InvalidCommandDefinition`] if the argument count does
    /// not match the placeholder count or an argument cannot be quoted.
    pub fn render(&self, args: &[&str]) -> Result<String> {
        let expected = self.placeholder_count();
        if args.len() != expected {
            return Err(ExecError::InvalidCommandDefinition {
                id: self.id.to_string(),
                reason: format!(
                    "template takes {expected} argument(s), {} supplied",
                    args.len()
                ),
            });
        }

        let quoted: Vec<Cow<'_, str>> = args
            .iter()
            .map(|arg| {
                shlex::try_quote(arg).map_err(|_| ExecError::InvalidCommandDefinition {
                    id: self.id.to_string(),
                    reason: format!("argument {arg:?} cannot be quoted"),
                })
            })
            .collect::<Result<_>>()?;

        // Single left-to-right pass so substituted text is never rescanned
        // for further placeholders.
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            if let Some(end) = after.find('}')
                && let Ok(n) = after[..end].parse::<usize>()
                && n < quoted.len()
            {
                out.push_str(&quoted[n]);
                rest = &after[end + 1..];
                continue;
            }
            out.push('{');
            rest = after;
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
#[path = "spec.test.rs"]
mod tests;

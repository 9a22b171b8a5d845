//! Pure parsers for git command output and remote URLs.

use lazy_regex::{regex_captures, regex_is_match};
use serde::Serialize;

/// Whether `value` already looks like a remote URL rather than a remote name.
/// Recognizes URL schemes git understands and scp-like `user@host:` remotes.
pub fn is_remote_url(value: &str) -> bool {
    regex_is_match!(
        r"^(?:(?:https?|git|ssh|git\+ssh|file)://|[\w.+-]+@[\w.-]+:)",
        value
    )
}

/// Repository coordinates derived from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryIdentity {
    /// The remote exactly as given, fragment included.
    pub remote: String,
    pub protocol: String,
    pub host: String,
    /// `owner/project`
    pub repository: String,
    pub owner: String,
    pub project: String,
}

impl RepositoryIdentity {
    /// Parse a remote URL.
    ///
    /// Supports `scheme://[user@]host[:port]/owner/project[.git]` and scp-like
    /// `[user@]host:owner/project[.git]` (protocol `ssh`). Fragments and query
    /// strings are ignored. Returns `None` for plain paths and remote names.
    pub fn parse(remote: &str) -> Option<Self> {
        let location = remote.split(['#', '?']).next().unwrap_or(remote);

        let (protocol, host, path) = if let Some((_, protocol, host, path)) = regex_captures!(
            r"^([a-zA-Z][a-zA-Z0-9+.-]*)://(?:[^@/]+@)?([^/:]+)(?::\d+)?/(.+)$",
            location
        ) {
            (protocol.to_ascii_lowercase(), host, path)
        } else if let Some((_, host, path)) =
            regex_captures!(r"^(?:[\w.+-]+@)?([\w.-]+):([^/\\].*)$", location)
        {
            ("ssh".to_string(), host, path)
        } else {
            return None;
        };

        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, project) = path.rsplit_once('/')?;
        let owner = owner.trim_start_matches('/');
        if owner.is_empty() || project.is_empty() {
            return None;
        }

        Some(Self {
            remote: remote.to_string(),
            protocol,
            host: host.to_string(),
            repository: format!("{owner}/{project}"),
            owner: owner.to_string(),
            project: project.to_string(),
        })
    }

    pub fn is_same_repo(&self, other: &Self) -> bool {
        is_same_repo(self, other)
    }
}

/// Two identities point at the same repository when protocol, host,
/// repository and owner match. The raw remote string may differ.
pub fn is_same_repo(a: &RepositoryIdentity, b: &RepositoryIdentity) -> bool {
    a.protocol == b.protocol
        && a.host == b.host
        && a.repository == b.repository
        && a.owner == b.owner
}

/// One line of `git status --porcelain` / `--short` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub index: char,
    pub worktree: char,
    pub path: String,
}

impl StatusEntry {
    pub fn is_untracked(&self) -> bool {
        self.index == '?' && self.worktree == '?'
    }
}

/// Parse short status output into entries, in git's order.
/// Renames keep the destination path.
pub fn parse_status(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (_, codes, path) = regex_captures!(r"^(.{2}) (.+)$", line)?;
            let mut codes = codes.chars();
            let index = codes.next()?;
            let worktree = codes.next()?;
            let path = path.rsplit_once(" -> ").map_or(path, |(_, to)| to);
            Some(StatusEntry {
                index,
                worktree,
                path: unquote_path(path),
            })
        })
        .collect()
}

/// Undo git's C-style path quoting (`"\303\251.txt"` is `é.txt`).
/// Unquoted paths are returned as-is.
fn unquote_path(path: &str) -> String {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.bytes().peekable();
    while let Some(byte) = rest.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let unescaped = match rest.next() {
            Some(digit @ b'0'..=b'7') => {
                let mut value = u16::from(digit - b'0');
                for _ in 0..2 {
                    if let Some(&next @ b'0'..=b'7') = rest.peek() {
                        value = value * 8 + u16::from(next - b'0');
                        rest.next();
                    }
                }
                u8::try_from(value).unwrap_or(u8::MAX)
            }
            Some(b'a') => 0x07,
            Some(b'b') => 0x08,
            Some(b'f') => 0x0c,
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'v') => 0x0b,
            Some(other) => other,
            None => b'\\',
        };
        bytes.push(unescaped);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Whether git's error text means the commit had no changes to record.
pub fn is_nothing_to_commit(text: &str) -> bool {
    regex_is_match!(
        r"nothing (?:added )?to commit|no changes added to commit",
        text
    )
}

/// A changelog line in the `* <subject> (<hash>)` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub subject: String,
    pub hash: String,
}

impl ChangelogEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let (_, subject, hash) =
            regex_captures!(r"^\*\s+(.*?)\s+\(([0-9a-f]{4,40})\)$", line.trim())?;
        Some(Self {
            subject: subject.to_string(),
            hash: hash.to_string(),
        })
    }
}

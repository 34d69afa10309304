//! Line diffing for conflict reports
//!
//! A classic LCS table over the two line sequences, backtracked into an edit
//! script of kept/removed/added lines. The script turns the server lines into
//! the user lines using deletions and insertions only.

/// One element of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    /// Line present on both sides
    Kept(&'a str),
    /// Server line absent from the user's text
    Removed(&'a str),
    /// User line absent from the server's text
    Added(&'a str),
}

impl DiffLine<'_> {
    /// Whether this entry is an insertion or a deletion
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Kept(_))
    }
}

/// Compute the edit script turning `server` into `user`.
///
/// When lengths tie during the backtrack an insertion is preferred over a
/// deletion. Reports depend on this exact ordering.
#[must_use]
pub fn diff_lines<'a>(server: &[&'a str], user: &[&'a str]) -> Vec<DiffLine<'a>> {
    let table = lcs_table(server, user);
    let mut script = Vec::with_capacity(server.len() + user.len());
    let (mut i, mut j) = (server.len(), user.len());

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && server[i - 1] == user[j - 1] {
            script.push(DiffLine::Kept(server[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            script.push(DiffLine::Added(user[j - 1]));
            j -= 1;
        } else {
            script.push(DiffLine::Removed(server[i - 1]));
            i -= 1;
        }
    }

    script.reverse();
    script
}

/// Diff two bodies split on `\n`.
///
/// Guarantees at least one change whenever the texts differ: if the line
/// script comes out change-free, the first lines of each side are reported
/// as a removal followed by an addition.
#[must_use]
pub fn diff_bodies<'a>(server_body: &'a str, user_body: &'a str) -> Vec<DiffLine<'a>> {
    let server: Vec<&str> = server_body.split('\n').collect();
    let user: Vec<&str> = user_body.split('\n').collect();
    let script = diff_lines(&server, &user);

    if server_body != user_body && !script.iter().any(DiffLine::is_change) {
        return vec![
            DiffLine::Removed(server.first().copied().unwrap_or_default()),
            DiffLine::Added(user.first().copied().unwrap_or_default()),
        ];
    }
    script
}

/// Render a script as `+ `/`- ` prefixed lines joined by `\n`, omitting kept
/// lines.
#[must_use]
pub fn render(script: &[DiffLine<'_>]) -> String {
    let mut out = String::new();
    for line in script {
        let (prefix, text) = match line {
            DiffLine::Kept(_) => continue,
            DiffLine::Removed(text) => ("- ", text),
            DiffLine::Added(text) => ("+ ", text),
        };
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(text);
    }
    out
}

/// Rendered conflict diff of `user_body` against `server_body`
#[must_use]
pub fn conflict_diff(server_body: &str, user_body: &str) -> String {
    render(&diff_bodies(server_body, user_body))
}

/// `dp[i][j]` is the LCS length of `server[..i]` and `user[..j]`
fn lcs_table(server: &[&str], user: &[&str]) -> Vec<Vec<usize>> {
    let mut dp = vec![vec![0usize; user.len() + 1]; server.len() + 1];
    for i in 1..=server.len() {
        for j in 1..=user.len() {
            dp[i][j] = if server[i - 1] == user[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }
    dp
}

//! Header reconciliation: keep exactly one up-to-date header at the end of
//! a scene body.

use crate::body::SceneBody;
use crate::header::{patterns, render_header};
use crate::scene::SceneRecord;

/// Remove every header block from `body`.
///
/// Only the matched `--[[ FIBARO_GIT_HOOK ... --]]` spans are cut; text
/// around them, including adjacent newlines, is left alone. Removal repeats
/// until no block remains, so blocks formed by joining the remainders are
/// removed too.
pub fn trim_headers<C: AsRef<[u8]> + ?Sized>(body: &C) -> SceneBody {
    let block = &patterns().block;
    let mut out = body.as_ref().to_vec();
    while let Some(range) = block.find(&out).map(|m| m.range()) {
        out.drain(range);
    }
    SceneBody::from(out)
}

impl SceneRecord {
    /// Strip all header blocks from `body`, leaving the fields untouched.
    pub fn trim_headers(&mut self) {
        self.body = trim_headers(&self.body);
    }

    /// Replace all header blocks in `body` with one freshly rendered header
    /// at the end.
    ///
    /// Trailing newlines left behind by the removed blocks are collapsed to
    /// one, so repeated calls on an unchanged record produce identical text.
    /// Other bytes, including `\r` line endings, are kept as they are.
    pub fn update_header(&mut self) {
        let mut body = trim_headers(&self.body).into_bytes();
        while body.last() == Some(&b'\n') {
            body.pop();
        }
        if !body.is_empty() {
            body.push(b'\n');
        }
        body.extend_from_slice(render_header(self).as_bytes());
        self.body = SceneBody::from(body);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

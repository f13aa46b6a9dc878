//! Embedded scene header codec.
//!
//! A scene file carries its metadata in a Lua block comment so the file
//! stays runnable:
//!
//! ```text
//! --[[ FIBARO_GIT_HOOK - DO NOT CHANGE AS IT WILL BE DISCARDED
//! @sceneID=203
//! @name="A_Trial_2"
//! @roomID=305
//! @autostart=false
//! @runConfig=TRIGGER_AND_MANUAL
//! @maxRunningInstance=2
//! @type="com.fibaro.luaScene"
//! @isLua=true
//! --]]
//! ```
//!
//! Parsing only looks at the first block in the text. Every key is optional
//! and looked up independently. The writer emits `@maxRunningInstance`
//! while the reader looks for `@maxRunningInstances`; files in the wild
//! carry both spellings, so neither side is changed.
//!
//! Matching runs on raw bytes with Unicode mode off, so files that are not
//! valid UTF-8 still parse. String values are decoded lossily.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::body::SceneBody;
use crate::scene::SceneRecord;

/// Opening marker of a header block, including the warning text.
pub const HEADER_OPEN: &str = "--[[ FIBARO_GIT_HOOK - DO NOT CHANGE AS IT WILL BE DISCARDED \n";

/// Closing marker of a header block.
pub const HEADER_CLOSE: &str = "--]]\n";

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Precompiled patterns for locating a header block and its keys.
#[derive(Debug)]
pub struct HeaderPatterns {
    /// A whole header block, non-greedy, spanning lines.
    pub block: Regex,
    scene_id: Regex,
    name: Regex,
    room_id: Regex,
    max_running_instances: Regex,
    run_config: Regex,
    object_type: Regex,
    autostart: Regex,
    is_lua: Regex,
    visible: Regex,
}

impl HeaderPatterns {
    fn compile() -> Self {
        let re = |p: &str| Regex::new(p).expect("valid header regex");
        Self {
            block: re(r"(?s-u)--\[\[ FIBARO_GIT_HOOK(.*?)--\]\]"),
            scene_id: re(r"(?-u)@sceneID=(.*)"),
            name: re(r#"(?-u)@name="(.*)""#),
            room_id: re(r"(?-u)@roomID=(.*)"),
            max_running_instances: re(r"(?-u)@maxRunningInstances=(.*)"),
            run_config: re(r"(?-u)@runConfig=(.*)"),
            object_type: re(r#"(?-u)@type="(.*)""#),
            autostart: re(r"(?-u)@autostart=(.*)"),
            is_lua: re(r"(?-u)@isLua=(.*)"),
            visible: re(r"(?-u)@visible=(.*)"),
        }
    }
}

/// Compiled once, shared read-only.
static PATTERNS: LazyLock<HeaderPatterns> = LazyLock::new(HeaderPatterns::compile);

/// The process-wide compiled header patterns.
pub fn patterns() -> &'static HeaderPatterns {
    &PATTERNS
}

// ---------------------------------------------------------------------------
// Parsed header
// ---------------------------------------------------------------------------

/// Keys found in a header block. `None` means the key was absent or its
/// value could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeader {
    pub scene_id: Option<i64>,
    pub name: Option<String>,
    pub room_id: Option<i64>,
    pub max_running_instances: Option<i64>,
    pub run_config: Option<String>,
    pub object_type: Option<String>,
    pub autostart: Option<bool>,
    pub is_lua: Option<bool>,
    pub visible: Option<bool>,
}

/// Locate the first header block in `content` and extract its keys.
///
/// Returns `None` when `content` carries no header block.
pub fn parse_header<C: AsRef<[u8]> + ?Sized>(content: &C) -> Option<ParsedHeader> {
    parse_header_with(patterns(), content)
}

/// [`parse_header`] with explicitly supplied patterns.
pub fn parse_header_with<C: AsRef<[u8]> + ?Sized>(
    patterns: &HeaderPatterns,
    content: &C,
) -> Option<ParsedHeader> {
    let block = patterns.block.find(content.as_ref())?.as_bytes();

    Some(ParsedHeader {
        scene_id: capture(&patterns.scene_id, block).and_then(parse_int),
        name: capture(&patterns.name, block).map(decode),
        room_id: capture(&patterns.room_id, block).and_then(parse_int),
        max_running_instances: capture(&patterns.max_running_instances, block).and_then(parse_int),
        run_config: capture(&patterns.run_config, block).map(|v| decode(v).trim().to_string()),
        object_type: capture(&patterns.object_type, block).map(decode),
        autostart: capture(&patterns.autostart, block).and_then(parse_bool),
        is_lua: capture(&patterns.is_lua, block).and_then(parse_bool),
        visible: capture(&patterns.visible, block).and_then(parse_bool),
    })
}

fn capture<'a>(re: &Regex, haystack: &'a [u8]) -> Option<&'a [u8]> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_bytes())
}

fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn parse_int(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.trim().parse().ok()
}

/// Accepts the literal spellings `1 t T TRUE true True` and their false
/// counterparts.
fn parse_bool(raw: &[u8]) -> Option<bool> {
    match std::str::from_utf8(raw).ok()?.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Record integration
// ---------------------------------------------------------------------------

impl SceneRecord {
    /// Replace `body` with `content` and load the fields of its first header.
    ///
    /// Without a header only `id` is cleared; all other fields keep the
    /// values the caller set up. With a header, a missing or `-1` scene id
    /// clears `id`, other missing integer keys become `0`, missing string
    /// keys become empty, and missing boolean keys leave the field untouched.
    ///
    /// The body keeps `content` byte for byte.
    pub fn parse<C: AsRef<[u8]> + ?Sized>(&mut self, content: &C) {
        let content = content.as_ref();
        self.body = SceneBody::from(content);

        let Some(header) = parse_header(content) else {
            self.id = None;
            return;
        };
        self.apply_header(header);
    }

    fn apply_header(&mut self, header: ParsedHeader) {
        self.id = header.scene_id.filter(|&id| id != -1);
        self.room_id = header.room_id.unwrap_or(0);
        self.name = header.name.unwrap_or_default();
        self.max_running_instances = header.max_running_instances.unwrap_or(0);
        self.run_config = header.run_config.unwrap_or_default();
        self.object_type = header.object_type.unwrap_or_default();
        if let Some(autostart) = header.autostart {
            self.autostart = autostart;
        }
        if let Some(is_lua) = header.is_lua {
            self.is_source_file = is_lua;
        }
        if let Some(visible) = header.visible {
            self.visible = visible;
        }
    }

    /// Render the header block for this record.
    pub fn to_header(&self) -> String {
        render_header(self)
    }
}

/// Serialize `record` into a header block. Output depends only on the
/// record's fields.
pub fn render_header(record: &SceneRecord) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(HEADER_OPEN);
    out.push_str(&format!("@sceneID={}\n", record.wire_id()));
    out.push_str(&format!("@name=\"{}\"\n", record.name));
    out.push_str(&format!("@roomID={}\n", record.room_id));
    out.push_str(&format!("@autostart={}\n", record.autostart));
    out.push_str(&format!("@runConfig={}\n", record.run_config));
    out.push_str(&format!(
        "@maxRunningInstance={}\n",
        record.max_running_instances
    ));
    out.push_str(&format!("@type=\"{}\"\n", record.object_type));
    out.push_str(&format!("@isLua={}\n", record.is_source_file));
    out.push_str(HEADER_CLOSE);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT_HEADER: &str = "--[[ FIBARO_GIT_HOOK\n\
@sceneID=203\n\
@name=\"A_Trial_2\"\n\
@roomID=305\n\
@runConfig=TRIGGER_AND_MANUAL\n\
@maxRunningInstances=2\n\
--]]\n";

    // -- render_header --

    #[test]
    fn renders_name_only_record() {
        let scene = SceneRecord {
            id: Some(0),
            name: "A Script Name".to_string(),
            ..SceneRecord::default()
        };
        assert_eq!(
            render_header(&scene),
            "--[[ FIBARO_GIT_HOOK - DO NOT CHANGE AS IT WILL BE DISCARDED \n\
@sceneID=0\n\
@name=\"A Script Name\"\n\
@roomID=0\n\
@autostart=false\n\
@runConfig=\n\
@maxRunningInstance=0\n\
@type=\"\"\n\
@isLua=false\n\
--]]\n"
        );
    }

    #[test]
    fn renders_full_record() {
        let scene = SceneRecord {
            id: Some(22),
            name: "Marvel".to_string(),
            room_id: 5,
            run_config: "MANUAL_ONLY".to_string(),
            max_running_instances: 2,
            body: "LuaScript".into(),
            object_type: "com.script".to_string(),
            autostart: true,
            is_source_file: true,
            visible: true,
        };
        assert_eq!(
            scene.to_header(),
            "--[[ FIBARO_GIT_HOOK - DO NOT CHANGE AS IT WILL BE DISCARDED \n\
@sceneID=22\n\
@name=\"Marvel\"\n\
@roomID=5\n\
@autostart=true\n\
@runConfig=MANUAL_ONLY\n\
@maxRunningInstance=2\n\
@type=\"com.script\"\n\
@isLua=true\n\
--]]\n"
        );
    }

    #[test]
    fn renders_absent_id_as_minus_one() {
        let header = render_header(&SceneRecord::default());
        assert!(header.contains("@sceneID=-1\n"));
    }

    #[test]
    fn rendering_is_stable() {
        let scene = SceneRecord::new();
        assert_eq!(render_header(&scene), render_header(&scene));
    }

    // -- parse_header --

    #[test]
    fn no_block_yields_none() {
        assert_eq!(parse_header("print('hello')\n@sceneID=4\n"), None);
    }

    #[test]
    fn parses_short_header() {
        let header = parse_header(SHORT_HEADER).unwrap();
        assert_eq!(header.scene_id, Some(203));
        assert_eq!(header.name.as_deref(), Some("A_Trial_2"));
        assert_eq!(header.room_id, Some(305));
        assert_eq!(header.run_config.as_deref(), Some("TRIGGER_AND_MANUAL"));
        assert_eq!(header.max_running_instances, Some(2));
        assert_eq!(header.autostart, None);
        assert_eq!(header.object_type, None);
    }

    #[test]
    fn unparsable_integer_is_absent() {
        let text = "--[[ FIBARO_GIT_HOOK\n@sceneID=hallo\n@roomID=\n--]]";
        let header = parse_header(text).unwrap();
        assert_eq!(header.scene_id, None);
        assert_eq!(header.room_id, None);
    }

    #[test]
    fn negative_integers_parse() {
        let header = parse_header("--[[ FIBARO_GIT_HOOK\n@sceneID=-1\n--]]").unwrap();
        assert_eq!(header.scene_id, Some(-1));
    }

    #[test]
    fn string_values_need_quotes() {
        let quoted = parse_header("--[[ FIBARO_GIT_HOOK\n@name=\"This is a test\"\n--]]").unwrap();
        assert_eq!(quoted.name.as_deref(), Some("This is a test"));

        let empty = parse_header("--[[ FIBARO_GIT_HOOK\n@name=\"\"\n--]]").unwrap();
        assert_eq!(empty.name.as_deref(), Some(""));

        let bare = parse_header("--[[ FIBARO_GIT_HOOK\n@name=22\n--]]").unwrap();
        assert_eq!(bare.name, None);

        let dangling = parse_header("--[[ FIBARO_GIT_HOOK\n@name=\"\n--]]").unwrap();
        assert_eq!(dangling.name, None);
    }

    #[test]
    fn boolean_spellings() {
        let yes = parse_header("--[[ FIBARO_GIT_HOOK\n@autostart=true\n@isLua=1\n--]]").unwrap();
        assert_eq!(yes.autostart, Some(true));
        assert_eq!(yes.is_lua, Some(true));

        let no = parse_header("--[[ FIBARO_GIT_HOOK\n@autostart=False\n--]]").unwrap();
        assert_eq!(no.autostart, Some(false));

        let junk = parse_header("--[[ FIBARO_GIT_HOOK\n@autostart=xx\n--]]").unwrap();
        assert_eq!(junk.autostart, None);
    }

    #[test]
    fn singular_max_running_instance_key_is_not_read() {
        let header = parse_header("--[[ FIBARO_GIT_HOOK\n@maxRunningInstance=9\n--]]").unwrap();
        assert_eq!(header.max_running_instances, None);
    }

    #[test]
    fn keys_outside_the_block_are_ignored() {
        let text = "-- @roomID=99\n--[[ FIBARO_GIT_HOOK\n@sceneID=3\n--]]\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.room_id, None);
        assert_eq!(header.scene_id, Some(3));
    }

    #[test]
    fn tolerates_carriage_returns() {
        let text = "--[[ FIBARO_GIT_HOOK\r\n@sceneID=12\r\n@runConfig=DISABLED\r\n@isLua=true\r\n--]]\r\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.scene_id, Some(12));
        assert_eq!(header.run_config.as_deref(), Some("DISABLED"));
        assert_eq!(header.is_lua, Some(true));
    }

    // -- SceneRecord::parse --

    #[test]
    fn parse_without_header_clears_id_only() {
        let mut scene = SceneRecord::new();
        scene.room_id = 8;
        scene.parse("print('no header')\n");
        assert_eq!(scene.id, None);
        assert_eq!(scene.room_id, 8);
        assert_eq!(scene.run_config, "MANUAL_ONLY");
        assert_eq!(scene.body, "print('no header')\n");
    }

    #[test]
    fn parse_with_header_resets_missing_values() {
        let mut scene = SceneRecord::new();
        scene.parse(SHORT_HEADER);
        assert_eq!(scene.id, Some(203));
        assert_eq!(scene.room_id, 305);
        assert_eq!(scene.name, "A_Trial_2");
        assert_eq!(scene.run_config, "TRIGGER_AND_MANUAL");
        assert_eq!(scene.max_running_instances, 2);
        // Missing string keys are cleared.
        assert_eq!(scene.object_type, "");
        // Missing boolean keys keep constructor defaults.
        assert!(scene.visible);
        assert!(!scene.autostart);
        assert_eq!(scene.body, SHORT_HEADER);
    }

    #[test]
    fn parse_treats_minus_one_id_as_absent() {
        let mut scene = SceneRecord::new();
        scene.parse("--[[ FIBARO_GIT_HOOK\n@sceneID=-1\n@roomID=3\n--]]");
        assert_eq!(scene.id, None);
        assert_eq!(scene.room_id, 3);
    }

    #[test]
    fn parse_reads_visible_key() {
        let mut scene = SceneRecord::new();
        scene.parse("--[[ FIBARO_GIT_HOOK\n@visible=false\n--]]");
        assert!(!scene.visible);
    }

    #[test]
    fn parse_round_trips_rendered_header() {
        let written = SceneRecord {
            id: Some(77),
            name: "Garden pump".to_string(),
            room_id: 12,
            run_config: "DISABLED".to_string(),
            max_running_instances: 0,
            body: SceneBody::new(),
            object_type: "com.fibaro.luaScene".to_string(),
            autostart: true,
            is_source_file: true,
            visible: true,
        };
        let text = format!("print('pump')\n{}", written.to_header());

        let mut parsed = SceneRecord::new();
        parsed.parse(&text);
        assert_eq!(parsed.id, written.id);
        assert_eq!(parsed.name, written.name);
        assert_eq!(parsed.room_id, written.room_id);
        assert_eq!(parsed.run_config, written.run_config);
        assert_eq!(parsed.object_type, written.object_type);
        assert_eq!(parsed.autostart, written.autostart);
        assert_eq!(parsed.is_source_file, written.is_source_file);
    }

    #[test]
    fn parse_keeps_non_utf8_bytes() {
        let content: &[u8] = b"-- Gr\xfc\xdfe aus der K\xfcche\r\nprint(1)\r\n";
        let mut scene = SceneRecord::new();
        scene.parse(content);
        assert_eq!(scene.id, None);
        assert_eq!(scene.body.as_bytes(), content);
    }

    #[test]
    fn header_found_around_non_utf8_bytes() {
        let content: &[u8] =
            b"-- K\xfcche\n--[[ FIBARO_GIT_HOOK\n@sceneID=7\n@name=\"K\xfcche\"\n--]]\n";
        let mut scene = SceneRecord::new();
        scene.parse(content);
        assert_eq!(scene.id, Some(7));
        assert_eq!(scene.name, "K\u{fffd}che");
        assert_eq!(scene.body.as_bytes(), content);
    }

    #[test]
    fn explicit_patterns_match_shared_ones() {
        let local = HeaderPatterns::compile();
        assert_eq!(
            parse_header_with(&local, SHORT_HEADER),
            parse_header(SHORT_HEADER)
        );
    }
}

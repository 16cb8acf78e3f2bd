//! Analysis options and the global-name tables they predeclare.
//!
//! Options arrive from two places: the `options` argument of an analysis call
//! (permissive, unknown names are ignored) and `/*jslint*/` directive comments
//! (strict, unknown names are reported by the lexer).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Globals provided by the language standard. Always predeclared.
pub const LANGUAGE_GLOBALS: &[&str] = &[
    "AggregateError", "Array", "ArrayBuffer", "Boolean", "DataView", "Date",
    "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent",
    "Error", "EvalError", "FinalizationRegistry", "Float32Array",
    "Float64Array", "Int8Array", "Int16Array", "Int32Array", "Intl", "JSON",
    "Map", "Math", "Number", "Object", "parseInt", "parseFloat", "Promise",
    "Proxy", "RangeError", "ReferenceError", "Reflect", "RegExp", "Set",
    "String", "Symbol", "SyntaxError", "TypeError", "Uint8Array",
    "Uint8ClampedArray", "Uint16Array", "Uint32Array", "URIError", "WeakMap",
    "WeakRef", "WeakSet",
];

/// Globals shared by web-style runtimes.
pub const WEB_GLOBALS: &[&str] = &[
    "AbortController", "AbortSignal", "atob", "Blob", "btoa",
    "ByteLengthQueuingStrategy", "clearInterval", "clearTimeout",
    "CompressionStream", "CountQueuingStrategy", "Crypto", "crypto",
    "CryptoKey", "DecompressionStream", "DOMException", "Event", "EventTarget",
    "fetch", "File", "FormData", "Headers", "navigator", "performance",
    "queueMicrotask", "ReadableByteStreamController", "ReadableStream",
    "ReadableStreamBYOBReader", "ReadableStreamBYOBRequest",
    "ReadableStreamDefaultController", "ReadableStreamDefaultReader", "Request",
    "Response", "setInterval", "setTimeout", "structuredClone", "SubtleCrypto",
    "TextDecoder", "TextDecoderStream", "TextEncoder", "TextEncoderStream",
    "TransformStream", "TransformStreamDefaultController", "URL",
    "URLSearchParams", "WebAssembly", "WritableStream",
    "WritableStreamDefaultController",
];

const BROWSER_EXTRA: &[&str] = &[
    "addEventListener", "AudioContext", "caches", "cancelAnimationFrame",
    "CharacterData", "customElements", "document", "DocumentType",
    "DOMParser", "Element", "FileReader", "FontFace", "getComputedStyle",
    "history", "indexedDB", "IntersectionObserver", "isSecureContext",
    "localStorage", "location", "matchMedia", "MediaRecorder",
    "MutationObserver", "Node", "postMessage", "removeEventListener",
    "requestAnimationFrame", "ResizeObserver", "RTCPeerConnection",
    "screen", "sessionStorage", "scrollTo", "WebSocket", "Worker",
    "XMLHttpRequest",
];

const BUN_EXTRA: &[&str] = &["Bun", "WebSocket", "Worker"];

const COUCH: &[&str] = &[
    "emit", "getRow", "isArray", "log", "provides", "registerType",
    "require", "send", "start", "sum", "toJSON",
];

const DENO_EXTRA: &[&str] = &[
    "addEventListener", "Deno", "FileReader", "localStorage",
    "removeEventListener", "sessionStorage", "WebSocket", "Worker",
];

const DEVEL: &[&str] = &["alert", "confirm", "console", "prompt"];

const GLOBAL: &[&str] = &["globalThis"];

const NODE_EXTRA: &[&str] = &[
    "clearImmediate", "exports", "module", "require", "setImmediate",
    "__dirname", "__filename",
];

const TJS_EXTRA: &[&str] = &["tjs", "WebSocket", "Worker"];

/// A recognized option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionName {
    /// Allow bitwise operators
    Bitwise,
    /// Assume a browser
    Browser,
    /// Assume Bun
    Bun,
    /// Assume CouchDB
    Couch,
    /// Assume Deno
    Deno,
    /// Allow development conveniences (console, debugger, TODO, empty blocks)
    Devel,
    /// Allow eval and Function
    Eval,
    /// Report line and column numbers starting at one
    Fudge,
    /// Allow get and set accessors
    Getset,
    /// Predeclare globalThis
    Global,
    /// Allow lines longer than 80 characters
    Long,
    /// Assume Node.js
    Node,
    /// Allow null
    Null,
    /// Allow this
    This,
    /// Assume txiki.js
    Tjs,
    /// Assume a generic web runtime
    Web,
    /// Ignore whitespace rules
    White,
}

impl OptionName {
    /// All recognized names.
    pub const ALL: &'static [OptionName] = &[
        OptionName::Bitwise,
        OptionName::Browser,
        OptionName::Bun,
        OptionName::Couch,
        OptionName::Deno,
        OptionName::Devel,
        OptionName::Eval,
        OptionName::Fudge,
        OptionName::Getset,
        OptionName::Global,
        OptionName::Long,
        OptionName::Node,
        OptionName::Null,
        OptionName::This,
        OptionName::Tjs,
        OptionName::Web,
        OptionName::White,
    ];

    /// The option's name as written in directives.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionName::Bitwise => "bitwise",
            OptionName::Browser => "browser",
            OptionName::Bun => "bun",
            OptionName::Couch => "couch",
            OptionName::Deno => "deno",
            OptionName::Devel => "devel",
            OptionName::Eval => "eval",
            OptionName::Fudge => "fudge",
            OptionName::Getset => "getset",
            OptionName::Global => "global",
            OptionName::Long => "long",
            OptionName::Node => "node",
            OptionName::Null => "null",
            OptionName::This => "this",
            OptionName::Tjs => "tjs",
            OptionName::Web => "web",
            OptionName::White => "white",
        }
    }

    /// Global names this option predeclares when it is turned on.
    ///
    /// Returns an empty list for plain behavior switches.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::OptionName;
    ///
    /// assert!(OptionName::Browser.preset_globals().contains(&"document"));
    /// assert!(OptionName::Node.preset_globals().contains(&"fetch"));
    /// assert!(OptionName::Bitwise.preset_globals().is_empty());
    /// ```
    pub fn preset_globals(self) -> Vec<&'static str> {
        let web_plus = |extra: &[&'static str]| {
            WEB_GLOBALS.iter().chain(extra.iter()).copied().collect()
        };
        match self {
            OptionName::Browser => web_plus(BROWSER_EXTRA),
            OptionName::Bun => web_plus(BUN_EXTRA),
            OptionName::Couch => COUCH.to_vec(),
            OptionName::Deno => web_plus(DENO_EXTRA),
            OptionName::Devel => DEVEL.to_vec(),
            OptionName::Global => GLOBAL.to_vec(),
            OptionName::Node => web_plus(NODE_EXTRA),
            OptionName::Tjs => web_plus(TJS_EXTRA),
            OptionName::Web => WEB_GLOBALS.to_vec(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

impl FromStr for OptionName {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// The effective option set of one analysis.
///
/// Every switch defaults to `false`.
///
/// # Examples
///
/// ```
/// use core_types::{OptionName, Options};
///
/// let options = Options::from_map([("bitwise", true), ("frobnicate", true)]);
/// assert!(options.get(OptionName::Bitwise));
/// assert!(!options.get(OptionName::Long));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Options {
    pub bitwise: bool,
    pub browser: bool,
    pub bun: bool,
    pub couch: bool,
    pub deno: bool,
    pub devel: bool,
    pub eval: bool,
    pub fudge: bool,
    pub getset: bool,
    pub global: bool,
    pub long: bool,
    pub node: bool,
    pub null: bool,
    pub this: bool,
    pub tjs: bool,
    pub web: bool,
    pub white: bool,
}

impl Options {
    /// Build options from name/value pairs, ignoring names that are not
    /// recognized.
    pub fn from_map<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut options = Options::default();
        for (name, value) in pairs {
            if let Ok(name) = name.parse::<OptionName>() {
                options.set(name, value);
            }
        }
        options
    }

    /// Read one switch.
    pub fn get(&self, name: OptionName) -> bool {
        match name {
            OptionName::Bitwise => self.bitwise,
            OptionName::Browser => self.browser,
            OptionName::Bun => self.bun,
            OptionName::Couch => self.couch,
            OptionName::Deno => self.deno,
            OptionName::Devel => self.devel,
            OptionName::Eval => self.eval,
            OptionName::Fudge => self.fudge,
            OptionName::Getset => self.getset,
            OptionName::Global => self.global,
            OptionName::Long => self.long,
            OptionName::Node => self.node,
            OptionName::Null => self.null,
            OptionName::This => self.this,
            OptionName::Tjs => self.tjs,
            OptionName::Web => self.web,
            OptionName::White => self.white,
        }
    }

    /// Set one switch.
    pub fn set(&mut self, name: OptionName, value: bool) {
        let slot = match name {
            OptionName::Bitwise => &mut self.bitwise,
            OptionName::Browser => &mut self.browser,
            OptionName::Bun => &mut self.bun,
            OptionName::Couch => &mut self.couch,
            OptionName::Deno => &mut self.deno,
            OptionName::Devel => &mut self.devel,
            OptionName::Eval => &mut self.eval,
            OptionName::Fudge => &mut self.fudge,
            OptionName::Getset => &mut self.getset,
            OptionName::Global => &mut self.global,
            OptionName::Long => &mut self.long,
            OptionName::Node => &mut self.node,
            OptionName::Null => &mut self.null,
            OptionName::This => &mut self.this,
            OptionName::Tjs => &mut self.tjs,
            OptionName::Web => &mut self.web,
            OptionName::White => &mut self.white,
        };
        *slot = value;
    }

    /// Set a switch by name, as a directive comment does.
    pub fn set_named(&mut self, name: &str, value: bool) -> Result<OptionName, UnknownOption> {
        let name: OptionName = name.parse()?;
        self.set(name, value);
        Ok(name)
    }

    /// Names of all switches currently on.
    pub fn enabled(&self) -> impl Iterator<Item = OptionName> + '_ {
        OptionName::ALL.iter().copied().filter(|name| self.get(*name))
    }

    /// The column/line offset renderers add: 1 with `fudge`, else 0.
    pub fn fudge(&self) -> usize {
        usize::from(self.fudge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_parses_back() {
        for name in OptionName::ALL {
            assert_eq!(name.as_str().parse::<OptionName>(), Ok(*name));
        }
    }

    #[test]
    fn test_set_named_rejects_unknown() {
        let mut options = Options::default();
        assert_eq!(
            options.set_named("sloppy", true),
            Err(UnknownOption("sloppy".into()))
        );
        assert_eq!(options.set_named("white", true), Ok(OptionName::White));
        assert!(options.white);
    }

    #[test]
    fn test_enabled_lists_switches() {
        let options = Options::from_map([("node", true), ("long", true), ("white", false)]);
        let on: Vec<_> = options.enabled().collect();
        assert_eq!(on, vec![OptionName::Long, OptionName::Node]);
    }

    #[test]
    fn test_presets_share_web_table() {
        for name in [OptionName::Browser, OptionName::Bun, OptionName::Deno, OptionName::Node] {
            assert!(name.preset_globals().contains(&"setTimeout"), "{name}");
        }
        assert!(!OptionName::Couch.preset_globals().contains(&"setTimeout"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: Options = serde_json::from_str(r#"{"this": true}"#).unwrap();
        assert!(options.this);
        assert!(!options.null);
    }
}

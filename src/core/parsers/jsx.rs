use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, anyhow};
use swc_common::{
    BytePos, FileName, Globals, SourceMap,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::core::context::ExecutionContext;

/// Extensions whose files may contain JSX.
const JSX_EXTENSIONS: &[&str] = &["tsx", "jsx", "js", "mjs", "cjs"];

/// Parser dialect selected from the file name.
///
/// TypeScript syntax is always on (it is a superset of the JavaScript we care
/// about); JSX is switched on by extension because `.ts` files use `<T>expr`
/// casts that conflict with JSX tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub jsx: bool,
    pub declaration_file: bool,
}

impl Dialect {
    pub fn for_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let declaration_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".d.ts"));
        Self {
            jsx: JSX_EXTENSIONS.contains(&ext),
            declaration_file,
        }
    }

    fn syntax(self) -> Syntax {
        Syntax::Typescript(TsSyntax {
            tsx: self.jsx,
            decorators: true,
            dts: self.declaration_file,
            ..Default::default()
        })
    }
}

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments copied out of swc's single-threaded store so the artifact can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Must be called before `comments` is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Comments attached before the node starting at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.leading.values().chain(self.trailing.values()).map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed source file: syntax tree, comments, original text and where it
/// came from.
pub struct ParsedArtifact {
    pub path: PathBuf,
    pub source: String,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    pub dialect: Dialect,
}

impl ParsedArtifact {
    /// 1-based line and column for a byte position inside this file.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col_display + 1)
    }
}

impl std::fmt::Debug for ParsedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedArtifact")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("items", &self.module.body.len())
            .field("comments", &self.comments.len())
            .finish()
    }
}

/// Parse source code into a syntax tree.
///
/// This is the pure parsing function; file reading and caching live in
/// [`parse`] and [`parse_with_cache`].
pub fn parse_source(code: String, path: &Path) -> Result<ParsedArtifact> {
    use swc_common::GLOBALS;

    let dialect = Dialect::for_path(path);
    let source_map = Arc::new(SourceMap::default());

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(path.into()).into(), code.clone());

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            dialect.syntax(),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", path.display(), e.kind()))?;

        Ok(ParsedArtifact {
            path: path.to_path_buf(),
            source: code,
            module,
            source_map: Arc::clone(&source_map),
            comments: ExtractedComments::from_swc(&comments),
            dialect,
        })
    })
}

/// Read and parse a file.
///
/// Empty files are common and not an error: they yield `None` silently.
/// Read and parse failures are logged and also yield `None`.
pub fn parse(ctx: &ExecutionContext, path: &Path) -> Option<ParsedArtifact> {
    let logger = ctx.logger();
    let code = match ctx.fs().read_file(path) {
        Ok(code) => code,
        Err(e) => {
            logger.warn(format_args!("Cannot read {}: {}", path.display(), e));
            return None;
        }
    };

    if code.trim().is_empty() {
        logger.debug(format_args!("Skipping empty file {}", path.display()));
        return None;
    }

    match parse_source(code, path) {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            logger.warn(e);
            None
        }
    }
}

/// Cache key for a parsed file.
pub fn parse_cache_key(path: &Path) -> String {
    format!("parse:{}", path.display())
}

/// Parse a file once per context.
///
/// The first call stores the artifact in the context's shared cache; later
/// calls for the same path return the same `Arc` without re-parsing. Files
/// are assumed not to change during a run, so entries are never invalidated.
/// Failed parses are not cached.
pub fn parse_with_cache(ctx: &ExecutionContext, path: &Path) -> Option<Arc<ParsedArtifact>> {
    let key = parse_cache_key(path);
    if let Some(artifact) = ctx.cache().get_as::<ParsedArtifact>(&key) {
        return Some(artifact);
    }

    let artifact = Arc::new(parse(ctx, path)?);
    ctx.cache().set_value(key, Arc::clone(&artifact));
    Some(artifact)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use swc_common::Spanned;
    use tempfile::tempdir;

    use crate::core::context::ExecutionContext;
    use crate::core::parsers::jsx::*;

    #[test]
    fn test_dialect_for_path() {
        assert!(Dialect::for_path(Path::new("App.tsx")).jsx);
        assert!(Dialect::for_path(Path::new("App.jsx")).jsx);
        assert!(Dialect::for_path(Path::new("App.js")).jsx);
        assert!(!Dialect::for_path(Path::new("utils.ts")).jsx);
        assert!(Dialect::for_path(Path::new("types.d.ts")).declaration_file);
        assert!(!Dialect::for_path(Path::new("types.ts")).declaration_file);
    }

    #[test]
    fn test_parse_tsx_source() {
        let code = "export const App = () => <div>Hello</div>;".to_string();
        let artifact = parse_source(code, Path::new("App.tsx")).unwrap();
        assert_eq!(artifact.module.body.len(), 1);
        assert!(artifact.source.contains("Hello"));
    }

    #[test]
    fn test_comments_are_extracted() {
        let code = "// greeting\nexport const hello = \"Hi\"; /* trailing */\n".to_string();
        let artifact = parse_source(code, Path::new("hello.ts")).unwrap();

        assert_eq!(artifact.comments.len(), 2);
        let start = artifact.module.body[0].span_lo();
        let leading = artifact.comments.leading_at(start);
        assert_eq!(leading.len(), 1);
        assert_eq!(&*leading[0].text, " greeting");
    }

    #[test]
    fn test_parse_ts_with_angle_bracket_cast() {
        let code = "const n = <number>value;".to_string();
        assert!(parse_source(code, Path::new("cast.ts")).is_ok());
    }

    #[test]
    fn test_parse_error() {
        let code = "const = ;".to_string();
        assert!(parse_source(code, Path::new("broken.ts")).is_err());
    }

    #[test]
    fn test_line_col() {
        let code = "const a = 1;\nconst b = 2;".to_string();
        let artifact = parse_source(code, Path::new("a.ts")).unwrap();
        let second = &artifact.module.body[1];
        let span = swc_common::Spanned::span(second);
        assert_eq!(artifact.line_col(span.lo), (2, 1));
    }

    #[test]
    fn test_parse_empty_file_yields_none() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("empty.tsx");
        fs::write(&file, "   \n").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        assert!(parse(&ctx, &file).is_none());
    }

    #[test]
    fn test_parse_missing_file_yields_none() {
        let dir = tempdir().unwrap();
        let ctx = ExecutionContext::new(dir.path());
        assert!(parse(&ctx, &dir.path().join("missing.tsx")).is_none());
    }

    #[test]
    fn test_parse_with_cache_parses_once_per_context() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("App.tsx");
        fs::write(&file, "export default function App() { return <p>Hi</p>; }").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        let first = parse_with_cache(&ctx, &file).unwrap();
        let second = parse_with_cache(&ctx, &file).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ctx.cache().stats().hits, 1);

        // A fresh context has its own cache and parses again.
        let fresh = ExecutionContext::new(dir.path());
        let third = parse_with_cache(&fresh, &file).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_parse_with_cache_does_not_cache_failures() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.ts");
        fs::write(&file, "const = ;").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        assert!(parse_with_cache(&ctx, &file).is_none());
        assert!(!ctx.cache().has(&parse_cache_key(&file)));
    }
}

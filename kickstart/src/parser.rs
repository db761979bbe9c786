use std::collections::VecDeque;

use log::{debug, info, trace};

use crate::{
    errors::{KickstartError, KickstartErrorKind, KickstartErrorList, ToResultKickstartError},
    handler::KickstartHandler,
    load::{lines_from_str, resolve_location, DefaultLoader, Loader},
    options::ParserOptions,
    preprocess::{preprocess, PreprocessMode},
    sections::{null::NullSection, SectionHandler, SectionManager},
    types::{KsLine, KsLineSource},
};

/// Where the state machine currently is
#[derive(Debug)]
enum State {
    /// Expecting single-line directives
    Commands,
    /// Reading the body of a section
    Section(ActiveSection),
    /// Input exhausted
    End,
}

#[derive(Debug)]
struct ActiveSection {
    section: Box<dyn SectionHandler>,
    /// The line that opened the section
    opener: KsLine,
    /// The header failed; swallow the body without storing it
    discard: bool,
}

/// Reads kickstart text into a [`KickstartHandler`]
#[derive(Debug)]
pub struct Parser {
    handler: KickstartHandler,
    options: ParserOptions,
    loader: Box<dyn Loader>,
    sections: SectionManager,

    // Collected in non-fatal mode
    errors: Vec<KickstartError>,
    warnings: Vec<KickstartError>,
}

impl Parser {
    pub fn new(handler: KickstartHandler) -> Self {
        let sections = SectionManager::for_version(handler.version());
        Self {
            handler,
            options: ParserOptions::default(),
            loader: Box::new(DefaultLoader::new()),
            sections,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    // Builder

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn errors_are_fatal(mut self, fatal: bool) -> Self {
        self.options.errors_are_fatal = fatal;
        self
    }

    pub fn follow_includes(mut self, follow: bool) -> Self {
        self.options.follow_includes = follow;
        self
    }

    pub fn missing_include_is_fatal(mut self, fatal: bool) -> Self {
        self.options.missing_include_is_fatal = fatal;
        self
    }

    pub fn unknown_sections_are_fatal(mut self, fatal: bool) -> Self {
        self.options.unknown_sections_are_fatal = fatal;
        self
    }

    pub fn unknown_commands_are_fatal(mut self, fatal: bool) -> Self {
        self.options.unknown_commands_are_fatal = fatal;
        self
    }

    pub fn warnings_are_errors(mut self, escalate: bool) -> Self {
        self.options.warnings_are_errors = escalate;
        self
    }

    pub fn process_ksappend(mut self, process: bool) -> Self {
        self.options.process_ksappend = process;
        self
    }

    pub fn missing_ksappend_is_fatal(mut self, fatal: bool) -> Self {
        self.options.missing_ksappend_is_fatal = fatal;
        self
    }

    pub fn max_include_depth(mut self, depth: usize) -> Self {
        self.options.max_include_depth = depth;
        self
    }

    pub fn verbose_errors(mut self, verbose: bool) -> Self {
        self.options.verbose_errors = verbose;
        self
    }

    /// Make an extra section known, replacing any with the same opener
    pub fn register_section(&mut self, section: Box<dyn SectionHandler>) {
        self.sections.register(section);
    }

    // Accessors

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn handler(&self) -> &KickstartHandler {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut KickstartHandler {
        &mut self.handler
    }

    pub fn into_handler(self) -> KickstartHandler {
        self.handler
    }

    pub fn errors(&self) -> &[KickstartError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warnings(&self) -> &[KickstartError] {
        &self.warnings
    }

    /// Fail with every collected error, if there were any
    pub fn collected_errors(&self) -> Result<(), KickstartErrorList> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(KickstartErrorList(self.errors.clone()))
        }
    }

    // Public parser functions

    /// Parse the kickstart at a path or URL
    pub fn read_kickstart(&mut self, location: &str, reset: bool) -> Result<(), KickstartError> {
        if reset {
            self.reset();
        }

        let text = self
            .loader
            .load(location)
            .map_err(|e| KickstartError::new_load(KsLine::default(), location, e))?;
        self.run(lines_from_str(
            &text,
            KsLineSource::File(location.to_string()),
        ))
    }

    /// Parse kickstart text held in memory
    pub fn read_kickstart_from_string(&mut self, text: &str, reset: bool) -> Result<(), KickstartError> {
        if reset {
            self.reset();
        }
        self.run(lines_from_str(text, KsLineSource::InputString))
    }

    /// Discard all accumulated state and diagnostics
    pub fn reset(&mut self) {
        self.handler.reset();
        self.errors.clear();
        self.warnings.clear();
    }

    // Internal parser functions

    fn run(&mut self, lines: Vec<KsLine>) -> Result<(), KickstartError> {
        let mode = PreprocessMode::new(
            self.options.process_ksappend,
            self.options.missing_ksappend_is_fatal,
        );
        let lines = preprocess(lines, mode, self.loader.as_ref())?;

        // Turn this into a queue so includes can be spliced in at the front
        let mut queue: VecDeque<KsLine> = VecDeque::from(lines);
        let mut state = State::Commands;
        loop {
            state = match state {
                State::End => break,
                state => match queue.pop_front() {
                    Some(line) => self.step(state, line, &mut queue)?,
                    None => {
                        self.finish(state)?;
                        State::End
                    }
                },
            };
        }

        info!(
            "Parsed kickstart with {} errors and {} warnings",
            self.errors.len(),
            self.warnings.len()
        );
        Ok(())
    }

    fn step(
        &mut self,
        state: State,
        line: KsLine,
        queue: &mut VecDeque<KsLine>,
    ) -> Result<State, KickstartError> {
        match state {
            State::Commands => self.command_line(line, queue),
            State::Section(active) => self.section_line(active, line, queue),
            State::End => Ok(State::End),
        }
    }

    fn command_line(
        &mut self,
        line: KsLine,
        queue: &mut VecDeque<KsLine>,
    ) -> Result<State, KickstartError> {
        let stripped = line.raw.trim();

        // Disregard empty lines and comments
        if stripped.is_empty() {
            return Ok(State::Commands);
        }
        if stripped.starts_with('#') {
            if let Some(platform) = stripped.strip_prefix("#platform=") {
                debug!("Found platform: {}", platform);
                self.handler.platform = Some(platform.trim().to_string());
            }
            return Ok(State::Commands);
        }

        let tokens = match tokenize(&line) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.fail(e)?;
                return Ok(State::Commands);
            }
        };
        let Some(first) = tokens.first() else {
            return Ok(State::Commands);
        };

        match first.as_str() {
            "%include" => self.include(&line, &tokens, queue)?,

            // Already handled by the preprocessor
            "%ksappend" => debug!("Skipping %ksappend line: {}", line.raw),

            "%end" => self.fail(KickstartError::new_syntax(
                line,
                "%end without a matching section",
            ))?,

            s if s.starts_with('%') => return self.open_section(line, tokens),

            _ => self.dispatch(line, tokens)?,
        }

        Ok(State::Commands)
    }

    fn dispatch(&mut self, line: KsLine, tokens: Vec<String>) -> Result<(), KickstartError> {
        match self.handler.dispatch(tokens, &line) {
            Ok(warnings) => {
                for warning in warnings {
                    self.warn(warning)?;
                }
                Ok(())
            }
            Err(KickstartError {
                line,
                error: KickstartErrorKind::UnknownCommand(name),
            }) if !self.options.unknown_commands_are_fatal => {
                self.warn(KickstartError::new_ignored_command(line, name))
            }
            Err(e) => self.fail(e),
        }
    }

    fn open_section(&mut self, line: KsLine, tokens: Vec<String>) -> Result<State, KickstartError> {
        let opener = tokens[0].clone();
        let mut discard = false;

        let section = match self.sections.get(&opener) {
            Some(section) => section,
            None if self.options.unknown_sections_are_fatal => {
                self.fail(KickstartError::new_unknown_section(line.clone(), &opener))?;
                discard = true;
                NullSection::new(&opener).boxed()
            }
            None => {
                self.warn(KickstartError::new_ignored_section(line.clone(), &opener))?;
                let section = NullSection::new(&opener).boxed();
                self.sections.register(section.new_instance());
                section
            }
        };

        trace!("Opening section {} at {}", opener, line);
        let mut active = ActiveSection {
            section,
            opener: line,
            discard,
        };

        if !active.discard {
            let version = self.handler.version();
            if let Err(e) = active
                .section
                .handle_header(version, &active.opener, tokens)
            {
                active.discard = true;
                self.fail(e)?;
            }
        }

        Ok(State::Section(active))
    }

    fn section_line(
        &mut self,
        mut active: ActiveSection,
        line: KsLine,
        queue: &mut VecDeque<KsLine>,
    ) -> Result<State, KickstartError> {
        match line.raw.split_whitespace().next() {
            Some("%end") => {
                self.close_section(active)?;
                Ok(State::Commands)
            }

            Some("%include") => {
                match tokenize(&line) {
                    Ok(tokens) => self.include(&line, &tokens, queue)?,
                    Err(e) => self.fail(e)?,
                }
                Ok(State::Section(active))
            }

            Some("%ksappend") => Ok(State::Section(active)),

            // Another section starts; re-queue the line so it opens it
            Some(word) if self.sections.is_known_section(word) => {
                self.unterminated(&active)?;
                self.close_section(active)?;
                queue.push_front(line);
                Ok(State::Commands)
            }

            word => {
                let is_comment = word.map_or(true, |w| w.starts_with('#'));
                if !active.discard && (active.section.all_lines() || !is_comment) {
                    active.section.handle_line(&line);
                }
                Ok(State::Section(active))
            }
        }
    }

    /// End of input reached
    fn finish(&mut self, state: State) -> Result<(), KickstartError> {
        if let State::Section(active) = state {
            self.unterminated(&active)?;
            self.close_section(active)?;
        }
        Ok(())
    }

    /// A section closed without %end
    fn unterminated(&mut self, active: &ActiveSection) -> Result<(), KickstartError> {
        if !self.handler.version().requires_section_end() {
            return Ok(());
        }
        self.fail(KickstartError::new_unterminated_section(
            active.opener.clone(),
            active.section.opener(),
        ))
    }

    fn close_section(&mut self, mut active: ActiveSection) -> Result<(), KickstartError> {
        if active.discard {
            debug!("Discarding section opened at {}", active.opener);
            return Ok(());
        }
        if let Err(e) = active.section.finalize(&mut self.handler) {
            self.fail(e)?;
        }
        Ok(())
    }

    fn include(
        &mut self,
        line: &KsLine,
        tokens: &[String],
        queue: &mut VecDeque<KsLine>,
    ) -> Result<(), KickstartError> {
        if tokens.len() != 2 {
            return self.fail(KickstartError::new_syntax(
                line.clone(),
                "%include expects exactly 1 argument",
            ));
        }

        if !self.options.follow_includes {
            debug!("Not following include: {}", tokens[1]);
            return Ok(());
        }

        let location = resolve_location(&line.source, &tokens[1]);
        debug!("Including file: {}", location);

        // Block recursive includes
        if line.source.include_chain().contains(&location.as_str()) {
            return self.fail(KickstartError::new_include(
                line.clone(),
                format!("Recursive include: {location}"),
            ));
        }

        if line.source.include_depth() >= self.options.max_include_depth {
            return self.fail(KickstartError::new_include(
                line.clone(),
                format!(
                    "Maximum include depth of {} exceeded",
                    self.options.max_include_depth
                ),
            ));
        }

        match self.loader.load(&location) {
            Ok(text) => {
                let source = KsLineSource::new_include(location, line);
                let lines = lines_from_str(&text, source);
                debug!("Splicing {} included lines", lines.len());
                for included in lines.into_iter().rev() {
                    queue.push_front(included);
                }
                Ok(())
            }
            Err(e) if e.is_not_found() && !self.options.missing_include_is_fatal => {
                debug!("Skipping missing file: {}", location);
                Ok(())
            }
            Err(e) => self.fail(KickstartError::new_load(line.clone(), location, e)),
        }
    }

    /// Abort or record an error, depending on the mode
    fn fail(&mut self, error: KickstartError) -> Result<(), KickstartError> {
        if self.options.errors_are_fatal || error.is_fatal() {
            return Err(error);
        }
        error.log(self.options.verbose_errors);
        self.errors.push(error);
        Ok(())
    }

    fn warn(&mut self, warning: KickstartError) -> Result<(), KickstartError> {
        if self.options.warnings_are_errors {
            return self.fail(warning);
        }
        warning.log(self.options.verbose_errors);
        self.warnings.push(warning);
        Ok(())
    }
}

/// Shell-split a line after dropping any trailing comment
fn tokenize(line: &KsLine) -> Result<Vec<String>, KickstartError> {
    shellwords::split(strip_comment(&line.raw)).to_result_parser_error(line)
}

/// Cut the line at the first `#` that starts a word outside of quotes
pub(crate) fn strip_comment(raw: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    let mut word_start = true;

    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            word_start = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') if quote != Some('\'') => escaped = true,
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '#') if word_start => return &raw[..i],
            _ => {}
        }
        word_start = quote.is_none() && c.is_whitespace();
    }

    raw
}

#[cfg(test)]
mod tests {
    use std::include_str;
    use std::io::Write;

    use indoc::indoc;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::{
        commands::{network::Network, partition::Partition, rootpw::Rootpw},
        sections::script::ScriptType,
        version::Version,
        ErrorCategory,
    };

    fn parser() -> Parser {
        Parser::new(KickstartHandler::new(Version::latest()))
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(contents.as_bytes()).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    fn partitions(parser: &Parser) -> usize {
        parser
            .handler()
            .command::<Partition>()
            .unwrap()
            .partitions
            .len()
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("part / # root"), "part / ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("rootpw \"a # b\""), "rootpw \"a # b\"");
        assert_eq!(strip_comment("rootpw 'x#y'"), "rootpw 'x#y'");
        assert_eq!(strip_comment("rootpw abc#def"), "rootpw abc#def");
        assert_eq!(strip_comment("rootpw a\\ #b"), "rootpw a\\ #b");
    }

    #[test]
    fn test_basic_accumulation() {
        let mut parser = parser();
        parser
            .read_kickstart_from_string("network --device=eth0\nnetwork --device=eth1\n", true)
            .unwrap();

        let devices: Vec<String> = parser
            .handler()
            .command::<Network>()
            .unwrap()
            .devices
            .iter()
            .map(|d| d.device.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(devices, vec!["eth0", "eth1"]);
    }

    #[test]
    fn test_collected_errors() {
        let mut parser = parser().errors_are_fatal(false);
        parser
            .read_kickstart_from_string("skipx\nbogus-one\nbogus-two\n", true)
            .unwrap();

        let KickstartErrorList(errors) = parser.collected_errors().unwrap_err();
        assert_eq!(errors.len(), 2);
        let text = KickstartErrorList(errors).to_string();
        assert_eq!(text.lines().filter(|l| l.starts_with("Unknown command")).count(), 2);

        parser.read_kickstart_from_string("skipx\n", true).unwrap();
        assert!(parser.collected_errors().is_ok());
    }

    #[test]
    fn test_platform_and_comments() {
        let mut parser = parser();
        parser
            .read_kickstart_from_string(
                indoc! {r#"
                    #platform=x86, AMD64, or Intel EM64T
                    rootpw --plaintext "pass # word" # trailing comment
                    %post
                    #platform=ignored
                    %end
                "#},
                true,
            )
            .unwrap();

        let handler = parser.handler();
        assert_eq!(
            handler.platform.as_deref(),
            Some("x86, AMD64, or Intel EM64T")
        );
        assert_eq!(
            handler.command::<Rootpw>().unwrap().password.as_deref(),
            Some("pass # word")
        );
        assert_eq!(handler.scripts[0].body, "#platform=ignored\n");
    }

    #[test]
    fn test_mismatched_quotes_always_fatal() {
        let mut parser = parser().errors_are_fatal(false);
        let err = parser
            .read_kickstart_from_string("rootpw \"unterminated\n", true)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Value);
    }

    #[test]
    fn test_include_simple() {
        let tmpfile = write_temp(indoc! {r#"
            # This is a test file
            part /boot --fstype=ext4 --size=1024
        "#});

        let mut parser = parser();
        parser
            .read_kickstart_from_string(
                &format!("%include {}", tmpfile.path().to_str().unwrap()),
                true,
            )
            .unwrap();
        assert_eq!(partitions(&parser), 1, "Assert we grabbed ONE partition");
    }

    #[test]
    fn test_include_nested() {
        // File(src):
        //     %include /tmp/file1
        // File(tmp/file1):
        //     %include file2
        // File(tmp/file2):
        //     <contents>
        let tmpfile2 = write_temp(indoc! {r#"
            # This is a test file
            part /boot --fstype=ext4 --size=1024
        "#});

        // A _relative_ include to the second file, hence we only use its name
        let tmpfile1 = write_temp(&format!(
            "%include {}",
            tmpfile2.path().file_name().unwrap().to_str().unwrap()
        ));

        let mut parser = parser();
        parser
            .read_kickstart_from_string(
                &format!("%include {}", tmpfile1.path().to_str().unwrap()),
                true,
            )
            .unwrap();
        assert!(parser.errors().is_empty(), "Assert no errors");
        assert_eq!(partitions(&parser), 1, "Assert we grabbed ONE partition");
    }

    #[test]
    fn test_include_recursive() {
        let mut tmpfile = NamedTempFile::new().unwrap();

        // This file will include itself
        let file = format!(
            indoc! {r#"
            # This is a test file
            %include {}
            part /boot --fstype=ext4 --size=1024
        "#},
            tmpfile.path().to_str().unwrap()
        );
        tmpfile.write_all(file.as_bytes()).unwrap();
        tmpfile.flush().unwrap();
        let src = format!("%include {}", tmpfile.path().to_str().unwrap());

        let mut strict = parser();
        let err = strict.read_kickstart_from_string(&src, true).unwrap_err();
        assert!(matches!(err.error, KickstartErrorKind::Include(_)));
        assert_eq!(err.line.lineno, 2, "Line number is relative to the included file");

        // Despite the error, we should recover gracefully
        // and correctly parse the part command
        let mut lenient = parser().errors_are_fatal(false);
        lenient.read_kickstart_from_string(&src, true).unwrap();
        assert_eq!(lenient.error_count(), 1, "Assert ONE error");
        assert_eq!(partitions(&lenient), 1, "Assert we grabbed ONE partition");
    }

    #[test]
    fn test_include_depth() {
        let innermost = write_temp("skipx\n");
        let middle = write_temp(&format!("%include {}\n", innermost.path().to_str().unwrap()));
        let src = format!("%include {}\n", middle.path().to_str().unwrap());

        let mut shallow = parser().max_include_depth(1);
        let err = shallow.read_kickstart_from_string(&src, true).unwrap_err();
        assert!(matches!(err.error, KickstartErrorKind::Include(_)));

        let mut deep = parser().max_include_depth(2);
        deep.read_kickstart_from_string(&src, true).unwrap();
        assert!(deep.handler().get("skipx").unwrap().seen());
    }

    #[test]
    fn test_include_line_numbers() {
        let included = write_temp("skipx\n\nbogus-command\n");
        let src = format!(
            "zerombr\n%include {}\n\nanother-bogus\n",
            included.path().to_str().unwrap()
        );

        let mut parser = parser().errors_are_fatal(false);
        parser.read_kickstart_from_string(&src, true).unwrap();

        let errors = parser.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line.lineno, 3, "Relative to the included file");
        assert!(matches!(errors[0].line.source, KsLineSource::Include(..)));
        assert_eq!(errors[1].line.lineno, 4, "Relative to the includer");
        assert!(matches!(errors[1].line.source, KsLineSource::InputString));
    }

    #[test]
    fn test_include_inside_section() {
        let included = write_temp("echo from include\n");
        let src = format!(
            "%post\necho before\n%include {}\necho after\n%end\n",
            included.path().to_str().unwrap()
        );

        let mut parser = parser();
        parser.read_kickstart_from_string(&src, true).unwrap();
        assert_eq!(
            parser.handler().scripts[0].body,
            "echo before\necho from include\necho after\n"
        );
    }

    #[test]
    fn test_sections() {
        let mut parser = parser();
        parser
            .read_kickstart_from_string(include_str!("test_files/scripts.ks"), true)
            .unwrap();
        let scripts = &parser.handler().scripts;
        assert_eq!(scripts.len(), 4, "Assert we grabbed FOUR scripts");

        let types: Vec<ScriptType> = scripts.iter().map(|s| s.script_type).collect();
        assert_eq!(
            types,
            vec![
                ScriptType::Pre,
                ScriptType::Pre,
                ScriptType::PreInstall,
                ScriptType::Post
            ]
        );
        assert!(scripts[3].body.contains("%not-a-section"));
        assert!(parser.handler().packages.packages.contains("vim-enhanced"));
    }

    #[test]
    fn test_section_eof() {
        let text = indoc!(
            r#"
            %pre
            echo "Hello World"
            "#,
        );

        let mut parser = parser();
        let err = parser.read_kickstart_from_string(text, true).unwrap_err();
        assert!(matches!(err.error, KickstartErrorKind::UnterminatedSection(_)));
        assert_eq!(err.line.lineno, 1, "Error cites the opening line");

        let mut legacy = Parser::new(KickstartHandler::new(Version::FC6));
        legacy.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(legacy.handler().scripts.len(), 1);
    }

    #[test]
    fn test_section_not_closed() {
        // Section is missing an %end and another section opens
        let text = indoc!(
            r#"
            %pre
            echo "Hello World"

            %post
            # do something
            %end
            "#,
        );

        let mut parser = parser().errors_are_fatal(false);
        parser.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(parser.error_count(), 1, "Assert ONE error");
        assert!(matches!(
            parser.errors()[0].error,
            KickstartErrorKind::UnterminatedSection(_)
        ));
        assert_eq!(parser.handler().scripts.len(), 2);

        let mut legacy = Parser::new(KickstartHandler::new(Version::FC6));
        legacy.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(legacy.handler().scripts.len(), 2);
        assert_eq!(legacy.handler().scripts[0].body, "echo \"Hello World\"\n");
    }

    #[test]
    fn test_unrecognized_section() {
        let text = indoc!(
            r#"
            %pre
            echo "Hello World"
            %end

            %unrecognized --flag
            # do something
            %end

            %post
            # do something
            %end
            "#,
        );

        let mut strict = parser();
        let err = strict.read_kickstart_from_string(text, true).unwrap_err();
        assert!(matches!(err.error, KickstartErrorKind::UnknownSection(_)));

        // The body of the unknown section is swallowed, so only ONE error
        let mut lenient = parser().errors_are_fatal(false);
        lenient.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(lenient.error_count(), 1, "Assert ONE error");
        assert_eq!(lenient.handler().scripts.len(), 2);
        assert!(lenient.handler().null_sections.is_empty());

        let mut tolerant = parser().unknown_sections_are_fatal(false);
        tolerant.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(tolerant.warnings().len(), 1);
        assert_eq!(tolerant.handler().scripts.len(), 2);
        assert_eq!(
            tolerant.handler().null_sections[0].to_string(),
            "\n%unrecognized --flag\n# do something\n%end\n"
        );
    }

    #[test]
    fn test_stray_end() {
        let mut parser = parser();
        let err = parser
            .read_kickstart_from_string("skipx\n%end\n", true)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert_eq!(err.line.lineno, 2);
    }

    #[test]
    fn test_bad_header_swallows_body() {
        let text = indoc!(
            r#"
            %post --bogus
            part / --size=1
            %end
            skipx
            "#,
        );

        let mut parser = parser().errors_are_fatal(false);
        parser.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(parser.error_count(), 1);
        assert!(parser.handler().scripts.is_empty());
        assert_eq!(partitions(&parser), 0);
        assert!(parser.handler().get("skipx").unwrap().seen());
    }

    #[test]
    fn test_disable_include() {
        let text = indoc!(
            r#"
            %include /some/file/1
            %include /some/file/2
            %include /some/file/3
            "#,
        );

        let mut parser = parser().follow_includes(false);
        parser.read_kickstart_from_string(text, true).unwrap();
        assert!(parser.errors().is_empty(), "Assert no errors");
    }

    #[test]
    fn test_include_no_error() {
        let text = indoc!(
            r#"
            %include /some/file/1
            %include /some/file/2
            %include /some/file/3
            "#,
        );

        let mut parser = parser().missing_include_is_fatal(false);
        parser.read_kickstart_from_string(text, true).unwrap();
        assert!(parser.errors().is_empty(), "Assert no errors");

        // Missing includes are I/O errors, which non-fatal mode cannot swallow
        let mut parser = Parser::new(KickstartHandler::new(Version::latest())).errors_are_fatal(false);
        let err = parser.read_kickstart_from_string(text, true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_include_missing_argument() {
        let mut parser = parser();
        let err = parser.read_kickstart_from_string("%include\n", true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[test]
    fn test_unknown_commands() {
        let mut strict = parser();
        let err = strict
            .read_kickstart_from_string("frobnicate\n", true)
            .unwrap_err();
        assert!(matches!(err.error, KickstartErrorKind::UnknownCommand(_)));

        let mut tolerant = parser().unknown_commands_are_fatal(false);
        tolerant.read_kickstart_from_string("frobnicate\n", true).unwrap();
        assert_eq!(tolerant.warnings().len(), 1);
        assert_eq!(tolerant.warnings()[0].category(), ErrorCategory::Warning);
    }

    #[test]
    fn test_warnings_are_errors() {
        let text = "part /home --size=1\npart /home --size=2\n";

        let mut parser = parser();
        parser.read_kickstart_from_string(text, true).unwrap();
        assert_eq!(parser.warnings().len(), 1);
        assert_eq!(partitions(&parser), 2);

        let mut parser = Parser::new(KickstartHandler::new(Version::latest())).warnings_are_errors(true);
        let err = parser.read_kickstart_from_string(text, true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Duplicate);
    }

    #[test]
    fn test_reset() {
        let mut parser = parser();
        parser.read_kickstart_from_string("part / --size=1\n", true).unwrap();
        parser.read_kickstart_from_string("part /home --size=1\n", false).unwrap();
        assert_eq!(partitions(&parser), 2);

        parser.read_kickstart_from_string("part /var --size=1\n", true).unwrap();
        assert_eq!(partitions(&parser), 1);
    }

    #[test]
    fn test_read_kickstart_file() {
        let tmpfile = write_temp("skipx\nbogus\n");
        let mut parser = parser();
        let err = parser
            .read_kickstart(tmpfile.path().to_str().unwrap(), true)
            .unwrap_err();
        assert_eq!(err.line.lineno, 2);
        assert_eq!(
            err.line.source,
            KsLineSource::File(tmpfile.path().to_str().unwrap().to_string())
        );

        let err = parser
            .read_kickstart("/definitely/not/here.ks", true)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_register_section() {
        let mut parser = parser();
        parser.register_section(NullSection::new("%custom").boxed());
        parser
            .read_kickstart_from_string("%custom\nanything goes\n%end\n", true)
            .unwrap();
        assert_eq!(parser.handler().null_sections.len(), 1);
    }
}

use std::{
    cell::RefCell,
    io::{BufRead, Write},
    rc::Rc,
};

use ledger::{Filter, Kind, Ledger, SortSpec, Summary, ViewParams, categories};

use crate::{
    commands::{self, Command, HELP, ParseError},
    config::AppConfig,
    error::{AppError, Result},
    view,
};

/// Prompt front-end: owns the ledger, the view parameters and the output.
///
/// The ledger subscription redraws the view after every change; view
/// parameter changes redraw directly since the ledger does not see them.
pub struct App<W: Write + 'static> {
    ledger: Rc<Ledger>,
    params: Rc<RefCell<ViewParams>>,
    out: Rc<RefCell<W>>,
    symbol: Rc<str>,
}

impl App<std::io::Stdout> {
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_output(config, std::io::stdout())
    }
}

impl<W: Write + 'static> App<W> {
    pub fn with_output(config: AppConfig, out: W) -> Result<Self> {
        let sort: SortSpec = config.sort.parse()?;
        let app = Self {
            ledger: Rc::new(Ledger::new()),
            params: Rc::new(RefCell::new(ViewParams {
                sort,
                ..ViewParams::default()
            })),
            out: Rc::new(RefCell::new(out)),
            symbol: Rc::from(config.currency_symbol.as_str()),
        };

        let (params, out, symbol) = (
            Rc::clone(&app.params),
            Rc::clone(&app.out),
            Rc::clone(&app.symbol),
        );
        app.ledger.on_change(move |records| {
            let params = params.borrow();
            let mut out = out.borrow_mut();
            view::render(&mut *out, records, &params, &symbol)?;
            Ok(())
        });

        if config.samples {
            ledger::load_samples(&app.ledger)?;
        }
        tracing::debug!(sort = %sort, samples = config.samples, "tally ready");
        Ok(app)
    }

    /// Reads commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead>(&self, input: R) -> Result<()> {
        self.prompt()?;
        for line in input.lines() {
            let line = line?;
            match commands::parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(err) = self.execute(command) {
                        self.report(&err)?;
                    }
                }
                Err(ParseError::Empty) => {}
                Err(err) => self.report(&AppError::Command(err.to_string()))?,
            }
            self.prompt()?;
        }
        Ok(())
    }

    fn prompt(&self) -> Result<()> {
        let mut out = self.out.borrow_mut();
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }

    fn report(&self, err: &AppError) -> Result<()> {
        tracing::debug!("command failed: {err}");
        writeln!(self.out.borrow_mut(), "error: {err}")?;
        Ok(())
    }

    fn redraw(&self) -> Result<()> {
        let records = self.ledger.get_all();
        let params = self.params.borrow();
        view::render(&mut *self.out.borrow_mut(), &records, &params, &self.symbol)?;
        Ok(())
    }

    pub(crate) fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::Add(draft) => {
                let record = self.ledger.add(draft)?;
                tracing::info!(id = record.id(), "transaction added");
            }
            Command::Remove(id) => match self.ledger.remove(id) {
                Some(_) => tracing::info!(id, "transaction deleted"),
                None => writeln!(self.out.borrow_mut(), "no transaction #{id}")?,
            },
            Command::Kind(kind) => {
                self.params.borrow_mut().kind = kind;
                self.redraw()?;
            }
            Command::Category(category) => {
                if let Filter::Only(name) = &category
                    && !Kind::ALL.iter().any(|kind| categories::is_suggested(*kind, name))
                {
                    tracing::debug!(category = %name, "filtering on a custom category");
                }
                self.params.borrow_mut().category = category;
                self.redraw()?;
            }
            Command::Sort(sort) => {
                self.params.borrow_mut().sort = sort;
                self.redraw()?;
            }
            Command::List => self.redraw()?,
            Command::Stats { json } => {
                let summary = Summary::of(&self.ledger.get_all());
                let mut out = self.out.borrow_mut();
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
                } else {
                    view::render_summary(&mut *out, &summary, &self.symbol)?;
                }
            }
            Command::Categories => view::render_categories(&mut *self.out.borrow_mut())?,
            Command::Help => writeln!(self.out.borrow_mut(), "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared buffer so tests can read what the app wrote.
    #[derive(Clone, Default)]
    struct Buffer(Rc<RefCell<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn app(samples: bool) -> (App<Buffer>, Buffer) {
        let buffer = Buffer::default();
        let config = AppConfig {
            samples,
            ..AppConfig::default()
        };
        (App::with_output(config, buffer.clone()).unwrap(), buffer)
    }

    #[test]
    fn samples_render_on_startup() {
        let (app, buffer) = app(true);
        assert_eq!(app.ledger.len(), 5);
        assert!(buffer.text().contains("Transactions (5)"));
    }

    #[test]
    fn script_adds_filters_and_removes() {
        let (app, buffer) = app(false);
        let script = "\
add income Salary 100 2025-01-01 pay
add expense Food 40 2025-01-02 groceries
kind expense
rm 1
rm 9
stats
quit
add expense Food 1 2025-01-03 ignored
";
        app.run(script.as_bytes()).unwrap();

        let text = buffer.text();
        assert_eq!(app.ledger.len(), 1);
        assert!(text.contains("[kind: expense | category: all | sort: date-desc]"));
        assert!(text.contains("no transaction #9"));
        assert!(text.contains("Balance -$40.00"));
    }

    #[test]
    fn invalid_input_is_reported_not_fatal() {
        let (app, buffer) = app(false);
        app.run("add expense Food 0 today free\nfly\nadd expense Food 2 today ok\n".as_bytes())
            .unwrap();

        let text = buffer.text();
        assert!(text.contains("error: Invalid amount: amount must be > 0, got 0.00"));
        assert!(text.contains("error: unknown command \"fly\""));
        assert_eq!(app.ledger.len(), 1);
    }

    #[test]
    fn stats_survive_amounts_at_the_limit() {
        let (app, buffer) = app(false);
        let script = "\
add expense Food 92233720368547758 2025-01-01 a
add expense Food 92233720368547758 2025-01-02 b
stats
";
        app.run(script.as_bytes()).unwrap();

        let text = buffer.text();
        assert_eq!(app.ledger.len(), 2);
        assert!(text.contains("Expenses $92233720368547758.07"));
        assert!(text.contains("Balance -$92233720368547758.07"));
    }

    #[test]
    fn stats_json_prints_cents() {
        let (app, buffer) = app(true);
        app.execute(Command::Stats { json: true }).unwrap();
        assert!(buffer.text().contains("\"balance\": 538000"));
    }

    #[test]
    fn bad_configured_sort_fails_fast() {
        let config = AppConfig {
            sort: "height-up".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            App::with_output(config, Buffer::default()),
            Err(AppError::Ledger(_))
        ));
    }
}

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::comparison::{self, Comparison, Selection};
use crate::config::Config;
use crate::error::{CompareError, LoadError};
use crate::index::IndexBuilder;
use crate::output::Renderer;
use crate::store::RecordStore;

/// A loaded record collection serving any number of selections
#[derive(Debug)]
pub struct Session {
    store: Arc<RecordStore>,
    index: IndexBuilder,
    evaluator_scored: Vec<String>,
}

impl Session {
    pub fn new(store: RecordStore, evaluator_scored: Vec<String>) -> Self {
        let store = Arc::new(store);
        Self {
            index: IndexBuilder::new(Arc::clone(&store)),
            store,
            evaluator_scored,
        }
    }

    /// Load the configured results document
    pub fn open(config: &Config) -> Result<Self, LoadError> {
        let store = RecordStore::from_file(&config.data_path)?;
        if store.is_empty() {
            warn!(path = %config.data_path.display(), "results document has no records");
        }
        Ok(Self::new(store, config.evaluator_scored_datasets.clone()))
    }

    pub fn index(&self) -> &IndexBuilder {
        &self.index
    }

    pub fn compare(&self, selection: &Selection) -> Result<Comparison<'_>, CompareError> {
        comparison::compare(&self.store, &self.index, selection, &self.evaluator_scored)
    }

    /// Render one selection. Returns whether a comparison was produced.
    pub fn respond(
        &self,
        out: &mut impl Write,
        renderer: &Renderer<'_>,
        selection: &Selection,
    ) -> io::Result<bool> {
        match self.compare(selection) {
            Ok(comparison) => {
                debug!(shape = ?comparison.shape(), "showing comparison");
                renderer.write_comparison(out, &comparison)?;
                Ok(true)
            }
            Err(error) => {
                info!(%error, ?selection, "selection not shown");
                renderer.write_error(out, &error)?;
                Ok(false)
            }
        }
    }

    /// Serve selections read line by line until EOF or `quit`.
    ///
    /// Each line is independent; a bad line is reported and the loop goes on.
    pub fn run_interactive(
        &self,
        input: impl BufRead,
        out: &mut impl Write,
        renderer: &Renderer<'_>,
    ) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }
            match line.parse::<Selection>() {
                Ok(selection) => {
                    self.respond(out, renderer, &selection)?;
                }
                Err(error) => {
                    debug!(line, %error, "unreadable selection");
                    writeln!(out, "❌ {}", error)?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }
}

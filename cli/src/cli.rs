use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weather_core::{view, FormField, RecordId, Transport, UreqTransport, WeatherApi, WeatherForm};

use crate::config::{Config, BASE_URL_ENV};
use crate::prompt::{self, Action};

type Confirmer = fn(&str) -> bool;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Create, browse, edit and delete stored weather lookups")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and WEATHER_API_URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log filter, e.g. "debug" or "weather_core=debug". Logs go to stderr.
    #[arg(long)]
    pub log: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        let config = Config::resolve(self.config.as_deref(), env_url, self.base_url)?;
        init_logging(self.log.as_deref(), &config.log_filter);

        info!(base_url = %config.base_url, "using weather backend");
        let api = WeatherApi::new(&config.base_url, UreqTransport::new());
        let mut form = WeatherForm::new(api, prompt::confirm as Confirmer);
        form.load();
        Shell { form }.run()
    }
}

fn init_logging(flag: Option<&str>, default: &str) {
    let filter = match flag {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// The interactive loop: render, ask for an action, apply it.
struct Shell<T> {
    form: WeatherForm<T, Confirmer>,
}

impl<T: Transport> Shell<T> {
    fn run(mut self) -> Result<()> {
        loop {
            println!("\n{}", view::render(&self.form));
            let Some(action) = prompt::action()? else {
                return Ok(());
            };
            match action {
                Action::Refresh => self.form.load(),
                Action::Add => self.add()?,
                Action::Edit => self.edit()?,
                Action::Delete => self.delete()?,
                Action::ShowRaw => self.show_raw()?,
                Action::Quit => return Ok(()),
            }
        }
    }

    fn add(&mut self) -> Result<()> {
        for field in FormField::ALL {
            let current = self.form.form().get(field).to_string();
            let Some(value) = prompt::field(field, &current)? else {
                return Ok(());
            };
            self.form.set_form_field(field, value);
        }
        self.form.submit();
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let Some(id) = self.pick("Record to edit")? else {
            return Ok(());
        };
        if !self.form.begin_edit_by_id(&id) {
            return Ok(());
        }

        for field in FormField::ALL {
            let current = self
                .form
                .edit_form()
                .map(|f| f.get(field).to_string())
                .unwrap_or_default();
            match prompt::field(field, &current)? {
                Some(value) => self.form.set_edit_field(field, value),
                None => {
                    self.form.cancel_edit();
                    return Ok(());
                }
            }
        }

        if prompt::yes_no("Save changes?")? == Some(true) {
            self.form.save_edit();
        } else {
            self.form.cancel_edit();
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        if let Some(id) = self.pick("Record to delete")? {
            self.form.delete(&id);
        }
        Ok(())
    }

    fn show_raw(&mut self) -> Result<()> {
        if let Some(id) = self.pick("Record to inspect")? {
            if let Some(record) = self.form.record(&id) {
                println!("{}", view::render_raw(record));
            }
        }
        Ok(())
    }

    fn pick(&self, message: &str) -> Result<Option<RecordId>> {
        if self.form.records().is_empty() {
            println!("{}", view::EMPTY_PLACEHOLDER);
            return Ok(None);
        }
        prompt::record(message, self.form.records())
    }
}

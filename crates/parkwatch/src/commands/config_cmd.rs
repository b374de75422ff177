//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { url, name, force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            config::parse_server(&url)?;
            let profile_name = global.profile.clone().unwrap_or_else(|| "default".into());

            let mut cfg = Config {
                default_profile: Some(profile_name.clone()),
                ..Config::default()
            };
            cfg.profiles
                .insert(profile_name.clone(), Profile { name, ..Profile::new(url) });

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Active profile: {profile_name}");
                eprintln!("\n  Test it: parkwatch status");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── SetServer <url> ─────────────────────────────────────────
        ConfigCommand::SetServer { url } => {
            config::parse_server(&url)?;

            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            cfg.profiles
                .entry(profile_name.clone())
                .and_modify(|p| p.server.clone_from(&url))
                .or_insert_with(|| Profile::new(url));
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set server on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: parkwatch config init <URL>");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.server);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

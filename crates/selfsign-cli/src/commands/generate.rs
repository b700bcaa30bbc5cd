//! Generate command handler: key pair, certificate, container.

use std::path::PathBuf;

use dialoguer::Select;
use secrecy::SecretString;
use zeroize::Zeroizing;

use selfsign_core::crypto::generate_passphrase;
use selfsign_core::engine::{generate_identity, GenerationMethod};
use selfsign_core::identity::ExportedIdentity;
use selfsign_core::SubjectAttributes;

use crate::app::AppContext;
use crate::cli::{GenerateArgs, MethodArg, SubjectArgs};
use crate::constants::{env_vars, CONTAINER_EXTENSION};
use crate::errors::CliError;
use crate::helpers::{
    default_container_path, non_empty, prompt_new_secret, prompt_optional, write_new_file,
};
use crate::ui::theme::{styled, styles};
use crate::ui::{
    badge, blank_line, format_datetime, header, hint, print, receipt, Badge, Spinner, UiContext,
};

/// Print a step indicator for the generate flow.
fn print_step(ctx: &UiContext, step: usize, total: usize, title: &str) {
    if !ctx.mode.is_pretty() {
        return;
    }
    let progress = format!("{}/{}", step, total);
    let progress_styled = styled(&progress, styles::dim(), ctx.color);
    let title_styled = styled(title, styles::bold(), ctx.color);
    println!("{}  {}", progress_styled, title_styled);
}

pub fn handle_generate(ctx: &AppContext, args: &GenerateArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let interactive = ctx.interactive(&ui, args.no_input);
    let config = ctx.config();

    if !ctx.quiet() {
        print(&ui, &header(&ui, "generate", None));
        blank_line(&ui);
    }

    print_step(&ui, 1, 3, "Method");
    let method_arg = resolve_method(args.method, interactive)?;
    if args.new_passphrase && method_arg != MethodArg::Brainwallet {
        return Err(CliError::invalid_input("--new-passphrase only applies to --method brainwallet").into());
    }

    print_step(&ui, 2, 3, "Secret");
    let min_length = config.passphrase.min_length;
    let mut generated_passphrase: Option<Zeroizing<String>> = None;
    let method = match method_arg {
        MethodArg::Brainwallet => {
            let passphrase = if args.new_passphrase {
                let words = Zeroizing::new(generate_passphrase(config.passphrase.words)?);
                let passphrase = SecretString::from(words.to_string());
                generated_passphrase = Some(words);
                passphrase
            } else {
                prompt_new_secret(env_vars::PASSPHRASE, "passphrase", interactive, min_length)?
            };
            GenerationMethod::Brainwallet { passphrase }
        }
        MethodArg::Random => GenerationMethod::RandomFile {
            password: prompt_new_secret(env_vars::PASSWORD, "password", interactive, min_length)?,
        },
    };

    print_step(&ui, 3, 3, "Subject");
    let attrs = collect_subject(&args.subject, interactive)?;
    let alias = non_empty(args.alias.clone())
        .or_else(|| non_empty(Some(attrs.common_name.clone())))
        .unwrap_or_else(|| "identity".to_string());

    let container_path = args
        .out
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_container_path(&config.output_dir(), &alias, CONTAINER_EXTENSION));
    if container_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "{} already exists (use --force to overwrite)",
            container_path.display()
        ))
        .into());
    }

    blank_line(&ui);
    let spinner = Spinner::start(&ui, &format!("Generating {}-bit RSA key", config.keys.bits));
    let identity = match generate_identity(&method, &attrs, &config.engine_config()) {
        Ok(identity) => {
            spinner.finish("Key pair generated");
            identity
        }
        Err(err) => {
            spinner.abandon();
            return Err(err.into());
        }
    };

    write_new_file(&container_path, &identity.container, args.force)?;
    if let Some(path) = &args.public_key_out {
        write_new_file(&PathBuf::from(path), &identity.public_key_pem, args.force)?;
    }

    let exported = ExportedIdentity::new(identity.public_key_pem.clone(), alias.clone());
    let identity_string = exported.encode()?;
    let summary = identity.certificate.summary();

    if ui.mode.is_json() {
        let mut output = serde_json::json!({
            "method": method.name(),
            "alias": alias,
            "container_path": container_path.display().to_string(),
            "public_key_pem": identity.public_key_pem,
            "identity": identity_string,
            "fingerprint": exported.fingerprint()?,
            "certificate": summary,
        });
        if let Some(words) = &generated_passphrase {
            output["passphrase"] = serde_json::Value::String(words.to_string());
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(words) = &generated_passphrase {
        print(&ui, &badge(&ui, Badge::Warn, "Write this passphrase down. It is the only way to recover this identity:"));
        print(&ui, &format!("  {}", styled(words, styles::bold(), ui.color)));
        blank_line(&ui);
    }

    let container_display = container_path.display().to_string();
    let fingerprint = exported.fingerprint()?;
    let not_after = format_datetime(&summary.not_after, ui.mode.is_pretty());
    let mut items = vec![
        ("Method", method.name()),
        ("Alias", alias.as_str()),
        ("Container", container_display.as_str()),
        ("Fingerprint", fingerprint.as_str()),
        ("Serial", summary.serial_number.as_str()),
        ("Not After", not_after.as_str()),
        ("Identity", identity_string.as_str()),
    ];
    let public_key_display = args.public_key_out.clone().unwrap_or_default();
    if args.public_key_out.is_some() {
        items.insert(3, ("Public Key", public_key_display.as_str()));
    }

    print(&ui, &receipt(&ui, "Identity generated", &items));
    if !ctx.quiet() && ui.mode.is_pretty() {
        blank_line(&ui);
        print(
            &ui,
            &hint(&ui, &format!("selfsign sign --container {} --digest <HASH>", container_display)),
        );
    }

    Ok(())
}

fn resolve_method(method: Option<MethodArg>, interactive: bool) -> anyhow::Result<MethodArg> {
    if let Some(method) = method {
        return Ok(method);
    }
    if !interactive {
        return Err(CliError::invalid_input("--method is required with --no-input or without a TTY").into());
    }
    let choice = Select::new()
        .with_prompt("Generation method")
        .items(&[
            "brainwallet (re-derivable from a passphrase)",
            "random (keys kept only in the container file)",
        ])
        .default(0)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read method: {}", e))?;
    Ok(if choice == 0 {
        MethodArg::Brainwallet
    } else {
        MethodArg::Random
    })
}

/// Merge subject flags with prompts for anything missing.
fn collect_subject(args: &SubjectArgs, interactive: bool) -> anyhow::Result<SubjectAttributes> {
    let ask = |value: &Option<String>, label: &str| -> anyhow::Result<String> {
        let value = match non_empty(value.clone()) {
            Some(v) => Some(v),
            None if interactive => prompt_optional(label)?,
            None => None,
        };
        Ok(value.unwrap_or_default())
    };

    let attrs = SubjectAttributes {
        common_name: ask(&args.cn, "Common name")?,
        country_name: ask(&args.country, "Country (2 letters)")?,
        state_or_province: ask(&args.state, "State or province")?,
        locality_name: ask(&args.locality, "Locality")?,
        organization_name: ask(&args.org, "Organization")?,
        organizational_unit_name: ask(&args.org_unit, "Organizational unit")?,
    };
    Ok(attrs)
}

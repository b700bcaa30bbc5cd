//! Public identity command handlers: export, import, verify.

use std::path::{Path, PathBuf};

use selfsign_core::identity::{import_identity, ExportedIdentity};
use selfsign_core::signing::verify_signature;
use selfsign_core::SelfSignError;

use crate::app::AppContext;
use crate::cli::{ExportArgs, ImportArgs, VerifyArgs};
use crate::errors::CliError;
use crate::helpers::{read_arg_or_file, read_text_file, write_new_file};
use crate::ui::{badge, print, receipt, Badge};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let pem = read_text_file(Path::new(&args.public_key), "public key")?;

    let identity = ExportedIdentity::new(pem, args.alias.trim());
    identity
        .rsa_public_key()
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    let encoded = identity.encode()?;

    if ui.mode.is_pretty() && !ctx.quiet() {
        let fingerprint = identity.fingerprint()?;
        print(
            &ui,
            &receipt(
                &ui,
                "Identity exported",
                &[("Alias", identity.alias.as_str()), ("Fingerprint", fingerprint.as_str())],
            ),
        );
    }
    println!("{}", encoded);
    Ok(())
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let text = read_arg_or_file(&args.identity)?;

    let identity = import_identity(&text).map_err(|err| match err {
        SelfSignError::ChecksumMismatch => {
            CliError::IntegrityFailed("Identity checksum does not match its payload".to_string())
                .into()
        }
        other => anyhow::Error::from(other),
    })?;

    if let Some(path) = &args.public_key_out {
        write_new_file(&PathBuf::from(path), &identity.public_key, args.force)?;
    }

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "alias": identity.alias,
            "fingerprint": identity.fingerprint()?,
            "publicKey": identity.public_key,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let fingerprint = identity.fingerprint()?;
    let mut items = vec![
        ("Alias", identity.alias.as_str()),
        ("Fingerprint", fingerprint.as_str()),
    ];
    if let Some(path) = &args.public_key_out {
        items.push(("Public Key", path.as_str()));
    }
    print(&ui, &receipt(&ui, "Identity checksum verified", &items));
    if args.public_key_out.is_none() && !ctx.quiet() {
        print(&ui, identity.public_key.trim_end());
    }
    Ok(())
}

pub fn handle_verify(ctx: &AppContext, args: &VerifyArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let pem = read_text_file(Path::new(&args.public_key), "public key")?;
    let signature = read_arg_or_file(&args.signature)?;

    let result = verify_signature(&pem, &args.digest, signature.trim());

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "digest": args.digest,
            "valid": result.is_ok(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    match result {
        Ok(()) => {
            if !ctx.quiet() {
                if ui.mode.is_pretty() {
                    print(&ui, &badge(&ui, Badge::Ok, "Signature is valid"));
                } else {
                    print(&ui, "status=ok");
                }
            }
            Ok(())
        }
        Err(SelfSignError::VerificationFailure(_)) => {
            Err(CliError::IntegrityFailed("Signature is not valid for this key and digest".to_string()).into())
        }
        Err(err) => Err(err.into()),
    }
}

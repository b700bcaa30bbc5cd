//! Container command handlers: sign, check, inspect.

use std::path::Path;

use selfsign_core::container::{check_password, unpack};
use selfsign_core::engine::sign_digest;

use crate::app::{unlock_with_retry, AppContext};
use crate::cli::{CheckArgs, InspectArgs, SignArgs};
use crate::helpers::read_text_file;
use crate::ui::{badge, blank_line, format_datetime, header, kv, print, receipt, Badge};

pub fn handle_sign(ctx: &AppContext, args: &SignArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let container = read_text_file(Path::new(&args.container), "container")?;
    let interactive = ctx.interactive(&ui, args.no_input);

    let signed = unlock_with_retry(interactive, |secret| {
        sign_digest(&container, secret, &args.digest)
    })?;

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "digest": args.digest,
            "signature": signed.signature_base64,
            "algorithm": signed.algorithm,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ctx.quiet() {
        println!("{}", signed.signature_base64);
        return Ok(());
    }

    print(
        &ui,
        &receipt(
            &ui,
            "Digest signed",
            &[
                ("Algorithm", signed.algorithm.as_str()),
                ("Signature", signed.signature_base64.as_str()),
            ],
        ),
    );
    Ok(())
}

pub fn handle_check(ctx: &AppContext, args: &CheckArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let container = read_text_file(Path::new(&args.container), "container")?;
    let interactive = ctx.interactive(&ui, args.no_input);

    unlock_with_retry(interactive, |secret| check_password(&container, secret))?;

    if !ctx.quiet() {
        if ui.mode.is_pretty() {
            print(&ui, &badge(&ui, Badge::Ok, "Password unlocks the container"));
        } else {
            print(&ui, "status=ok");
        }
    }
    Ok(())
}

pub fn handle_inspect(ctx: &AppContext, args: &InspectArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let container = read_text_file(Path::new(&args.container), "container")?;
    let interactive = ctx.interactive(&ui, args.no_input);

    let unpacked = unlock_with_retry(interactive, |secret| unpack(&container, secret))?;
    let summary = unpacked.certificate.summary();
    let public_key_pem =
        selfsign_core::crypto::public_key_to_pem(&unpacked.private_key.to_public_key())?;
    drop(unpacked);

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "certificate": summary,
            "public_key_pem": public_key_pem,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let pretty = ui.mode.is_pretty();
    print(&ui, &header(&ui, "inspect", Some(&args.container)));
    blank_line(&ui);
    print(&ui, &kv(&ui, "Subject", &summary.subject));
    print(&ui, &kv(&ui, "Issuer", &summary.issuer));
    print(&ui, &kv(&ui, "Serial", &summary.serial_number));
    print(&ui, &kv(&ui, "Not Before", &format_datetime(&summary.not_before, pretty)));
    print(&ui, &kv(&ui, "Not After", &format_datetime(&summary.not_after, pretty)));
    print(&ui, &kv(&ui, "Signature Algorithm", &summary.signature_algorithm));

    let validity = if summary.self_signature_valid {
        badge(&ui, Badge::Ok, "Self-signature verifies")
    } else {
        badge(&ui, Badge::Err, "Self-signature does not verify")
    };
    if pretty {
        blank_line(&ui);
        print(&ui, &validity);
        blank_line(&ui);
        print(&ui, public_key_pem.trim_end());
    } else {
        print(&ui, &kv(&ui, "Self Signature Valid", &summary.self_signature_valid.to_string()));
    }
    Ok(())
}

use std::io::Write;

use hibp_client::{Breach, Paste};

use crate::error::Error;

pub fn password_count(out: &mut impl Write, count: u64, json: bool) -> Result<(), Error> {
    if json {
        writeln!(out, "{}", serde_json::json!({ "count": count }))?;
    } else if count == 0 {
        writeln!(out, "Password not found in any known breach")?;
    } else {
        writeln!(out, "Password seen {count} times in breaches")?;
    }
    Ok(())
}

pub fn breaches(out: &mut impl Write, breaches: &[Breach], json: bool) -> Result<(), Error> {
    if json {
        serde_json::to_writer_pretty(&mut *out, breaches)?;
        writeln!(out)?;
        return Ok(());
    }

    for breach in breaches {
        writeln!(
            out,
            "{} ({}): {} accounts, breached {}{}",
            breach.title(),
            breach.domain(),
            breach.pwn_count(),
            breach.breach_date().format("%Y-%m-%d"),
            if breach.is_verified() { "" } else { " [unverified]" },
        )?;
        if !breach.data_classes().is_empty() {
            writeln!(out, "    {}", breach.data_classes().join(", "))?;
        }
    }
    writeln!(out, "{} breach(es)", breaches.len())?;
    Ok(())
}

pub fn pastes(out: &mut impl Write, pastes: &[Paste], json: bool) -> Result<(), Error> {
    if json {
        serde_json::to_writer_pretty(&mut *out, pastes)?;
        writeln!(out)?;
        return Ok(());
    }

    for paste in pastes {
        let date = paste.date().map(|d| d.format("%Y-%m-%d").to_string());
        writeln!(
            out,
            "{} {} ({} emails){}{}",
            paste.source(),
            paste.title().unwrap_or(paste.identifier()),
            paste.email_count(),
            date.map(|d| format!(", posted {d}")).unwrap_or_default(),
            paste.url().map(|u| format!(" {u}")).unwrap_or_default(),
        )?;
    }
    writeln!(out, "{} paste(s)", pastes.len())?;
    Ok(())
}

/// The query succeeded but the service has nothing for it.
pub fn no_results(out: &mut impl Write, json: bool) -> Result<(), Error> {
    if json {
        writeln!(out, "[]")?;
    } else {
        writeln!(out, "No results")?;
    }
    Ok(())
}

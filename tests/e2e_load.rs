mod support;

use std::io::Write;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use support::{closed_port_url, report_count, run_gust, spawn_http_server_or_skip};

#[test]
fn request_limit_run_reports_exact_totals() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(200)? else {
        return Ok(());
    };

    let output = run_gust(["-u", &url, "-r", "5", "-c", "2", "-q", "false"])?;
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let requests = report_count(&stdout, "Requests:")?;
    let success = report_count(&stdout, "Successful requests:")?;
    let network_failed = report_count(&stdout, "Network failed:")?;
    let bad_failed = report_count(&stdout, "Bad requests failed (!2xx):")?;

    if requests != 10 || success != 10 || network_failed != 0 || bad_failed != 0 {
        return Err(format!(
            "Unexpected totals: requests={} success={} network_failed={} bad_failed={}",
            requests, success, network_failed, bad_failed
        ));
    }
    Ok(())
}

#[test]
fn non_ok_responses_are_classified_bad() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(404)? else {
        return Ok(());
    };

    let output = run_gust(["-u", &url, "-r", "3", "-c", "1", "-q", "false"])?;
    if !output.status.success() {
        return Err(format!(
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let requests = report_count(&stdout, "Requests:")?;
    let success = report_count(&stdout, "Successful requests:")?;
    let bad_failed = report_count(&stdout, "Bad requests failed (!2xx):")?;

    if requests != 3 || success != 0 || bad_failed != 3 {
        return Err(format!(
            "Unexpected totals: requests={} success={} bad_failed={}",
            requests, success, bad_failed
        ));
    }
    Ok(())
}

#[test]
fn refused_connections_count_as_network_failures() -> Result<(), String> {
    let Some(url) = closed_port_url()? else {
        return Ok(());
    };

    let output = run_gust(["-u", &url, "-r", "2", "-c", "1", "--connect-timeout", "500"])?;
    if !output.status.success() {
        return Err(format!(
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let requests = report_count(&stdout, "Requests:")?;
    let network_failed = report_count(&stdout, "Network failed:")?;

    if requests != 2 || network_failed != 2 {
        return Err(format!(
            "Unexpected totals: requests={} network_failed={}",
            requests, network_failed
        ));
    }
    Ok(())
}

#[test]
fn period_run_stops_on_time_with_one_report() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(200)? else {
        return Ok(());
    };

    let started = Instant::now();
    let output = run_gust(["-u", &url, "-t", "1", "-c", "4"])?;
    let elapsed = started.elapsed();

    if !output.status.success() {
        return Err(format!(
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    if elapsed > Duration::from_secs(10) {
        return Err(format!("Run took too long: {:?}", elapsed));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let reports = stdout
        .lines()
        .filter(|line| line.starts_with("Test time:"))
        .count();
    if reports != 1 {
        return Err(format!("Expected exactly one report, found {}", reports));
    }
    Ok(())
}

#[test]
fn post_body_file_is_sent() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(200)? else {
        return Ok(());
    };

    let mut body = NamedTempFile::new().map_err(|err| format!("tempfile failed: {}", err))?;
    body.write_all(b"name=value")
        .map_err(|err| format!("write body failed: {}", err))?;
    let body_path = body.path().to_string_lossy().into_owned();

    let output = run_gust(["-u", &url, "-r", "2", "-c", "1", "-q", "false", "-d", &body_path])?;
    if !output.status.success() {
        return Err(format!(
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if report_count(&stdout, "Successful requests:")? != 2 {
        return Err("Expected both POST requests to succeed".to_owned());
    }
    Ok(())
}

#[test]
fn urls_file_and_url_are_merged() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(200)? else {
        return Ok(());
    };

    let mut list = NamedTempFile::new().map_err(|err| format!("tempfile failed: {}", err))?;
    writeln!(list, "{}", url).map_err(|err| format!("write list failed: {}", err))?;
    let list_path = list.path().to_string_lossy().into_owned();

    // Two URLs per pass and a limit of 3: the pass boundary overshoots to 4.
    let output = run_gust(["-u", &url, "-f", &list_path, "-r", "3", "-c", "1", "-q", "false"])?;
    if !output.status.success() {
        return Err(format!(
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if report_count(&stdout, "Requests:")? != 4 {
        return Err(format!(
            "Expected overshoot to 4 requests, got stdout:\n{}",
            stdout
        ));
    }
    Ok(())
}

#[test]
fn missing_url_source_exits_nonzero() -> Result<(), String> {
    let output = run_gust(["-r", "5"])?;
    if output.status.success() {
        return Err("Expected a configuration failure".to_owned());
    }
    if output.status.code() != Some(1) {
        return Err(format!("Expected exit code 1, got {:?}", output.status.code()));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("URL") {
        return Err(format!("Expected usage guidance, got: {}", stderr));
    }
    Ok(())
}

#[test]
fn missing_stop_condition_exits_nonzero() -> Result<(), String> {
    let output = run_gust(["-u", "http://127.0.0.1/"])?;
    if output.status.success() {
        return Err("Expected a configuration failure".to_owned());
    }
    if output.status.code() != Some(1) {
        return Err(format!("Expected exit code 1, got {:?}", output.status.code()));
    }
    Ok(())
}

#[test]
fn conflicting_stop_conditions_exit_nonzero() -> Result<(), String> {
    let output = run_gust(["-u", "http://127.0.0.1/", "-r", "5", "-t", "5"])?;
    if output.status.success() {
        return Err("Expected conflicting flags to fail".to_owned());
    }
    if output.status.code() != Some(1) {
        return Err(format!("Expected exit code 1, got {:?}", output.status.code()));
    }
    Ok(())
}

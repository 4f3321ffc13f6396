use sqlx::mysql::MySqlConnectOptions;

use crate::error::AgentError;

/// Build connect options from either a `mysql://` URL or a Go-driver DSN
/// such as `user:password@tcp(host:3306)/dbname?parseTime=true`
pub fn connect_options(connection: &str) -> Result<MySqlConnectOptions, AgentError> {
    if connection.starts_with("mysql://") {
        return Ok(connection.parse::<MySqlConnectOptions>()?);
    }

    parse_dsn(connection)
}

fn invalid(dsn: &str, reason: &str) -> AgentError {
    AgentError::Config(format!("invalid mysql DSN `{}`: {}", redact(dsn), reason))
}

/// Hide the password portion before a DSN reaches the logs
fn redact(dsn: &str) -> String {
    match dsn.rsplit_once('@') {
        Some((credentials, rest)) => {
            let user = credentials.split(':').next().unwrap_or("");
            format!("{}:***@{}", user, rest)
        }
        None => dsn.to_string(),
    }
}

fn parse_dsn(dsn: &str) -> Result<MySqlConnectOptions, AgentError> {
    // The database name never contains '/', so the last one separates it
    let (head, tail) = dsn
        .rsplit_once('/')
        .ok_or_else(|| invalid(dsn, "missing '/' before the database name"))?;
    let database = tail.split('?').next().unwrap_or_default();

    let (credentials, address) = match head.rsplit_once('@') {
        Some((credentials, address)) => (Some(credentials), address),
        None => (None, head),
    };

    let mut options = MySqlConnectOptions::new();

    if let Some(credentials) = credentials {
        match credentials.split_once(':') {
            Some((user, password)) => options = options.username(user).password(password),
            None => options = options.username(credentials),
        }
    }

    if let Some((net, rest)) = address.split_once('(') {
        let addr = rest
            .strip_suffix(')')
            .ok_or_else(|| invalid(dsn, "unterminated address"))?;

        match net {
            "tcp" => {
                let (host, port) = split_host_port(addr).map_err(|reason| invalid(dsn, reason))?;
                options = options.host(host);
                if let Some(port) = port {
                    options = options.port(port);
                }
            }
            "unix" => options = options.socket(addr),
            _ => return Err(invalid(dsn, "unsupported protocol")),
        }
    }

    if !database.is_empty() {
        options = options.database(database);
    }

    Ok(options)
}

fn split_host_port(addr: &str) -> Result<(&str, Option<u16>), &'static str> {
    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or("unterminated IPv6 address")?;
        (host, after.strip_prefix(':'))
    } else {
        match addr.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (addr, None),
        }
    };

    let port = port
        .map(|p| p.parse::<u16>().map_err(|_| "invalid port"))
        .transpose()?;

    Ok((host, port))
}

use crate::domain::{CpuStat, DiskStat, MemoryMetrics, NetDevStat};
use crate::error::{ParseError, ParseResult};

fn number(value: &str, field: &str) -> ParseResult<u64> {
    value
        .parse::<u64>()
        .map_err(|e| ParseError::Parse(format!("{}: {}", field, e)))
}

fn column<'a>(parts: &[&'a str], index: usize, field: &str) -> ParseResult<&'a str> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}

/// Parse /proc/uptime, keeping the first field as text
pub fn parse_uptime(content: &str) -> ParseResult<String> {
    content
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ParseError::Parse("Empty uptime file".to_string()))
}

/// Parse /proc/meminfo; values stay in kB
pub fn parse_meminfo(content: &str) -> ParseResult<MemoryMetrics> {
    let mut memory = MemoryMetrics::default();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let slot = match key.trim() {
            "MemTotal" => &mut memory.total,
            "MemFree" => &mut memory.free,
            "MemAvailable" => &mut memory.available,
            "Buffers" => &mut memory.buffers,
            "Cached" => &mut memory.cached,
            "SwapTotal" => &mut memory.swap_total,
            "SwapFree" => &mut memory.swap_free,
            _ => continue,
        };

        let value_str = value.trim().trim_end_matches("kB").trim();
        *slot = Some(number(value_str, key.trim())?);
    }

    if memory.is_empty() {
        return Err(ParseError::Parse("No memory counters in meminfo".to_string()));
    }

    Ok(memory)
}

/// Parse /proc/diskstats into per-device sector counters
pub fn parse_diskstats(content: &str) -> ParseResult<Vec<DiskStat>> {
    let mut stats = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        // major minor name reads merged sectors_read ms writes merged sectors_written ...
        let device = column(&parts, 2, "device")?;
        let sectors_read = number(column(&parts, 5, "sectors_read")?, "sectors_read")?;
        let sectors_written = number(column(&parts, 9, "sectors_written")?, "sectors_written")?;

        stats.push(DiskStat::new(device, sectors_read, sectors_written));
    }

    Ok(stats)
}

/// Parse every `cpu*` line of /proc/stat
pub fn parse_cpu_stats(content: &str) -> ParseResult<Vec<CpuStat>> {
    let mut stats = Vec::new();

    for line in content.lines() {
        if !line.starts_with("cpu") {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 11 {
            return Err(ParseError::Parse(format!("Incomplete cpu stat: {}", parts[0])));
        }

        stats.push(CpuStat {
            label: parts[0].to_string(),
            user: number(parts[1], "user")?,
            nice: number(parts[2], "nice")?,
            system: number(parts[3], "system")?,
            idle: number(parts[4], "idle")?,
            iowait: number(parts[5], "iowait")?,
            irq: number(parts[6], "irq")?,
            softirq: number(parts[7], "softirq")?,
            steal: number(parts[8], "steal")?,
            guest: number(parts[9], "guest")?,
            guest_nice: number(parts[10], "guest_nice")?,
        });
    }

    if stats.is_empty() {
        return Err(ParseError::Parse("Missing cpu line".to_string()));
    }

    Ok(stats)
}

/// Parse /proc/net/dev, skipping the two header lines
pub fn parse_net_dev(content: &str) -> ParseResult<Vec<NetDevStat>> {
    let mut stats = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() || line.contains('|') {
            continue;
        }

        // Counters may be glued to the colon when they grow wide
        let (name, counters) = line
            .split_once(':')
            .ok_or_else(|| ParseError::Parse(format!("Malformed interface line: {}", line)))?;
        let parts: Vec<&str> = counters.split_whitespace().collect();

        let bytes_received = number(column(&parts, 0, "rx_bytes")?, "rx_bytes")?;
        let bytes_sent = number(column(&parts, 8, "tx_bytes")?, "tx_bytes")?;

        stats.push(NetDevStat::new(name.trim(), bytes_received, bytes_sent));
    }

    Ok(stats)
}

/// Parse /proc/mounts
#[derive(Debug, Clone)]
pub struct MountInfo {
    pub device: String,
    pub mount_point: String,
    pub filesystem: String,
}

pub fn parse_mounts(content: &str) -> ParseResult<Vec<MountInfo>> {
    let mut mounts = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }

        mounts.push(MountInfo {
            device: parts[0].to_string(),
            mount_point: unescape_mount_path(parts[1]),
            filesystem: parts[2].to_string(),
        });
    }

    Ok(mounts)
}

/// Undo the octal escaping the kernel applies to spaces and tabs in paths
fn unescape_mount_path(raw: &str) -> String {
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

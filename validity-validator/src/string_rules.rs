// 字符串规则谓词
//
// 每个函数都是 (item, 已解析参数) 的纯函数；长度一律按 Unicode 码点计算。

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]*$").unwrap());

static ALPHA_DASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-_]*$").unwrap());

static ALPHA_NUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]*$").unwrap());

// ASCII 空白：\t \n \f \r 和空格
static FULL_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\t\n\x0C\r .]*$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+\..+$").unwrap());

// "Feb 3, 2013 at 7:54pm (PST)"：两位分钟、四位年份、小写 am/pm，括号里是时区
static DATE_SHAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<stamp>[A-Za-z]{3} [0-9]{1,2}, [0-9]{4} at [0-9]{1,2}:[0-9]{2}(?:am|pm))",
        r" \((?P<zone>[^()]+)\)$",
    ))
    .unwrap()
});

const DATE_LAYOUT: &str = "%b %-d, %Y at %-I:%M%P";

const ACCEPTED_TOKENS: [&str; 3] = ["yes", "on", "1"];

/// 码点长度
pub fn char_len(item: &str) -> i64 {
    item.chars().count() as i64
}

pub fn accepted(item: &str) -> bool {
    ACCEPTED_TOKENS.contains(&item)
}

pub fn alpha(item: &str) -> bool {
    ALPHA_REGEX.is_match(item)
}

pub fn alpha_dash(item: &str) -> bool {
    ALPHA_DASH_REGEX.is_match(item)
}

pub fn alpha_num(item: &str) -> bool {
    ALPHA_NUM_REGEX.is_match(item)
}

/// 开区间 (min, max)
pub fn between(item: &str, min: i64, max: i64) -> bool {
    let len = char_len(item);
    len > min && len < max
}

/// 闭区间 [min, max]
pub fn between_inclusive(item: &str, min: i64, max: i64) -> bool {
    let len = char_len(item);
    len >= min && len <= max
}

pub fn date(item: &str) -> bool {
    let Some(caps) = DATE_SHAPE_REGEX.captures(item) else {
        return false;
    };
    is_zone_abbreviation(&caps["zone"])
        && NaiveDateTime::parse_from_str(&caps["stamp"], DATE_LAYOUT).is_ok()
}

/// 时区缩写：3 个大写字母；4 个时以 T 结尾或为 WITA；5 个时以 T 结尾；
/// 另有 ChST、MeST、GMT[±h] 和 ±h（h ≤ 12）
fn is_zone_abbreviation(zone: &str) -> bool {
    if zone == "ChST" || zone == "MeST" {
        return true;
    }
    if let Some(offset) = zone.strip_prefix("GMT") {
        return offset.is_empty() || is_signed_hour_offset(offset);
    }
    if zone.starts_with(['+', '-']) {
        return is_signed_hour_offset(zone);
    }
    if !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return false;
    }
    match zone.len() {
        3 => true,
        4 => zone.ends_with('T') || zone == "WITA",
        5 => zone.ends_with('T'),
        _ => false,
    }
}

fn is_signed_hour_offset(offset: &str) -> bool {
    let Some(hours) = offset.strip_prefix(['+', '-']) else {
        return false;
    };
    !hours.is_empty()
        && hours.bytes().all(|b| b.is_ascii_digit())
        && hours.parse::<u32>().is_ok_and(|h| h <= 12)
}

/// 宽松的邮箱格式：前缀@域名.后缀
pub fn email(item: &str) -> bool {
    EMAIL_REGEX.is_match(item)
}

pub fn full_name(item: &str) -> bool {
    FULL_NAME_REGEX.is_match(item)
}

pub fn ip(item: &str) -> bool {
    item.parse::<IpAddr>().is_ok()
}

/// 点分 IPv4，或 IPv4 映射的 IPv6（`::ffff:a.b.c.d`）
pub fn ipv4(item: &str) -> bool {
    match item.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => true,
        Ok(IpAddr::V6(addr)) => addr.to_ipv4_mapped().is_some(),
        Err(_) => false,
    }
}

pub fn ipv6(item: &str) -> bool {
    matches!(item.parse::<IpAddr>(), Ok(IpAddr::V6(_)))
}

/// 注意语义是"长度不等于"
pub fn len(item: &str, length: i64) -> bool {
    char_len(item) != length
}

pub fn max(item: &str, length: i64) -> bool {
    char_len(item) <= length
}

pub fn min(item: &str, length: i64) -> bool {
    char_len(item) >= length
}

/// 未锚定的模式在任意位置匹配即可
///
/// `\d`、`\w`、`\s` 按 regex crate 的默认语义匹配 Unicode 字符类，
/// 例如 `^\d+$` 也接受阿拉伯-印度数字；需要只匹配 ASCII 时写 `[0-9]` 或 `(?-u:\d)`。
pub fn regexp(item: &str, pattern: &Regex) -> bool {
    pattern.is_match(item)
}

/// 请求 URI
///
/// - `*`
/// - 绝对路径 `/...`
/// - 带 scheme 的 URI：`scheme:opaque` 或 `scheme://authority/path`
///
/// 查询串（第一个 `?` 之后）不做检查；路径中的 `%` 必须是合法转义；
/// 任何位置都不允许 ASCII 控制字符。
pub fn url(item: &str) -> bool {
    if item.is_empty() || item.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return false;
    }
    if item == "*" {
        return true;
    }

    let Some((scheme, rest)) = split_scheme(item) else {
        return false;
    };
    let rest = rest.split_once('?').map_or(rest, |(path, _query)| path);

    if !rest.starts_with('/') {
        return scheme.is_some();
    }

    match rest.strip_prefix("//") {
        Some(after) if scheme.is_some() => {
            let (authority, path) = after.find('/').map_or((after, ""), |at| after.split_at(at));
            is_valid_authority(authority) && has_valid_escapes(path)
        }
        _ => has_valid_escapes(rest),
    }
}

/// `None` 表示以 `:` 开头（缺少 scheme）
fn split_scheme(raw: &str) -> Option<(Option<&str>, &str)> {
    for (i, c) in raw.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => return None,
            ':' => return Some((Some(&raw[..i]), &raw[i + 1..])),
            _ => break,
        }
    }
    Some((None, raw))
}

/// `[userinfo@]host[:port]`，空 authority 合法
fn is_valid_authority(authority: &str) -> bool {
    let (userinfo, host) = match authority.rsplit_once('@') {
        Some((userinfo, host)) => (Some(userinfo), host),
        None => (None, authority),
    };

    let userinfo_ok = userinfo.map_or(true, |u| {
        u.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._:~!$&'()*+,;=%@".contains(c))
    });
    userinfo_ok && is_valid_host(host)
}

fn is_valid_host(host: &str) -> bool {
    if host.is_empty() {
        return true;
    }

    let (name, port) = if host.starts_with('[') {
        match host.rfind(']') {
            Some(end) => host.split_at(end + 1),
            None => return false,
        }
    } else {
        host.rfind(':').map_or((host, ""), |at| host.split_at(at))
    };

    let port_ok = port.is_empty()
        || port
            .strip_prefix(':')
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()));
    port_ok && (name.is_empty() || url::Host::parse(name).is_ok())
}

/// 每个 `%` 后面跟两个十六进制数字
fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

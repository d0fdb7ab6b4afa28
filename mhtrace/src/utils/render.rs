/// helper functions for rendering
use crate::data::*;
use itertools::*;

pub fn rendervec(fs: &[String]) -> String {
    format!("[{}]", fs.join(", "))
}

pub fn renderfloats(fs: &[f64], high_prec: bool) -> String {
    rendervec(&fs.iter().map(|x| fmt_f64(high_prec)(*x)).collect_vec())
}

pub fn fmt_f64(high_precision: bool) -> impl Fn(f64) -> String {
    if high_precision {
        move |x: f64| format!("{}", x)
    } else {
        move |x: f64| format!("{:.2}", x)
    }
}

pub fn render_record(r: &Record) -> String {
    format!(
        "{} ~ {}{}{} = {} (lp {})",
        r.address,
        r.erp.name(),
        renderfloats(&r.params, true),
        match (r.structural, r.conditioned) {
            (true, true) => " [structural, observed]",
            (true, false) => " [structural]",
            (false, true) => " [observed]",
            (false, false) => "",
        },
        r.val.pretty(),
        fmt_f64(false)(r.log_density),
    )
}

pub fn render_addresses(xs: &[Address]) -> String {
    rendervec(&xs.iter().map(|a| a.to_string()).collect_vec())
}

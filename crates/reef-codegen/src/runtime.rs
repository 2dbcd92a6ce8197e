//! The runtime library surface generated programs call into.
//!
//! The runtime itself lives outside this crate (`@reef/runtime`); codegen
//! only needs its binding name, its module specifier, the set of callable
//! names, and -- for standalone output -- an inline stand-in object that
//! implements the names the emitter's own lowerings depend on and throws
//! for everything that needs real platform bindings.

/// The global binding every generated reference goes through.
pub const GLOBAL: &str = "$rt";

/// Module specifier used by the import/require preamble.
pub const MODULE_SPECIFIER: &str = "@reef/runtime";

/// Every callable name the runtime exposes, grouped by concern. The
/// stand-in object in [`stub_text`] defines exactly these keys.
pub const NAMES: &[&str] = &[
    // io
    "print", "println", "eprintln", "readLine",
    // string
    "str", "parseInt", "parseFloat", "split", "join", "trim",
    // math
    "abs", "min", "max", "floor", "ceil", "sqrt", "pow", "randomFloat",
    // collections
    "len", "push", "pop", "slice", "idx", "range", "eq", "clone", "debug", "unwrap",
    // concurrency
    "spawn", "channel", "sleep",
    // fs
    "readFile", "writeFile", "exists",
    // process
    "args", "env", "exit", "exec",
    // crypto
    "sha256", "randomBytes",
    // time
    "now", "secs", "millis",
];

/// Whether a bare name resolves to the runtime surface.
pub fn is_runtime_name(name: &str) -> bool {
    NAMES.contains(&name)
}

/// The inline stand-in runtime, emitted when output must run without the
/// real runtime package installed. Helpers the emitter's lowerings call
/// (`str`, `slice`, `idx`, `eq`, `clone`, `debug`, `unwrap`, `range`,
/// duration conversions) are implemented in full; platform-bound names
/// throw when reached.
pub fn stub_text() -> &'static str {
    r"const $rt = {
  print: (v) => process.stdout.write($rt.str(v)),
  println: (v) => console.log(v === undefined ? '' : $rt.str(v)),
  eprintln: (v) => console.error(v === undefined ? '' : $rt.str(v)),
  readLine: () => { throw new Error('not available in stub runtime: readLine'); },
  str: (v) => {
    if (typeof v === 'string') return v;
    if (Array.isArray(v)) return '[' + v.map($rt.str).join(', ') + ']';
    if (v && typeof v === 'object') {
      if (v.tag !== undefined) {
        return v.payload === undefined ? v.tag : v.tag + '(' + $rt.str(v.payload) + ')';
      }
      return '{ ' + Object.keys(v).map((k) => k + ': ' + $rt.str(v[k])).join(', ') + ' }';
    }
    return String(v);
  },
  parseInt: (s) => Number.parseInt(s, 10),
  parseFloat: (s) => Number.parseFloat(s),
  split: (s, sep) => s.split(sep),
  join: (xs, sep) => xs.map($rt.str).join(sep),
  trim: (s) => s.trim(),
  abs: Math.abs,
  min: Math.min,
  max: Math.max,
  floor: Math.floor,
  ceil: Math.ceil,
  sqrt: Math.sqrt,
  pow: Math.pow,
  randomFloat: Math.random,
  len: (v) => v.length,
  push: (xs, v) => { xs.push(v); return xs; },
  pop: (xs) => xs.pop(),
  slice: (v, s, e) => {
    if (s < 0 || e > v.length || s > e) {
      throw new Error('slice out of bounds: ' + s + '..' + e + ' on length ' + v.length);
    }
    return v.slice(s, e);
  },
  idx: (v, i, n) => {
    if (n !== undefined && v.length !== n) {
      throw new Error('array length mismatch: expected ' + n + ', got ' + v.length);
    }
    if (i < 0 || i >= v.length) {
      throw new Error('index out of bounds: ' + i + ' on length ' + v.length);
    }
    return v[i];
  },
  range: (s, e, incl) => {
    const out = [];
    for (let i = s; incl ? i <= e : i < e; i++) out.push(i);
    return out;
  },
  eq: (a, b) => {
    if (a === b) return true;
    if (Array.isArray(a) && Array.isArray(b)) {
      return a.length === b.length && a.every((x, i) => $rt.eq(x, b[i]));
    }
    if (a && b && typeof a === 'object' && typeof b === 'object') {
      const ka = Object.keys(a);
      const kb = Object.keys(b);
      return ka.length === kb.length && ka.every((k) => $rt.eq(a[k], b[k]));
    }
    return false;
  },
  clone: (v) => {
    if (Array.isArray(v)) return v.map($rt.clone);
    if (v && typeof v === 'object') {
      const out = {};
      for (const k of Object.keys(v)) out[k] = $rt.clone(v[k]);
      return out;
    }
    return v;
  },
  debug: (v) => {
    const s = JSON.stringify(v);
    return s === undefined ? String(v) : s;
  },
  unwrap: (v) => {
    if (v && typeof v === 'object' && v.tag !== undefined) {
      if (v.tag === 'Err' || v.tag === 'None') {
        throw new Error('unwrap on ' + v.tag);
      }
      return v.payload;
    }
    return v;
  },
  spawn: (f) => Promise.resolve().then(() => f()),
  channel: () => {
    const queue = [];
    const waiters = [];
    return {
      sender: {
        send: (v) => {
          if (waiters.length > 0) waiters.shift()(v);
          else queue.push(v);
        },
      },
      receiver: {
        recv: () => {
          if (queue.length > 0) return Promise.resolve(queue.shift());
          return new Promise((resolve) => waiters.push(resolve));
        },
      },
    };
  },
  sleep: (ms) => new Promise((resolve) => setTimeout(resolve, ms)),
  readFile: () => { throw new Error('not available in stub runtime: readFile'); },
  writeFile: () => { throw new Error('not available in stub runtime: writeFile'); },
  exists: () => { throw new Error('not available in stub runtime: exists'); },
  args: () => process.argv.slice(2),
  env: (k) => process.env[k],
  exit: (code) => process.exit(code),
  exec: () => { throw new Error('not available in stub runtime: exec'); },
  sha256: () => { throw new Error('not available in stub runtime: sha256'); },
  randomBytes: () => { throw new Error('not available in stub runtime: randomBytes'); },
  now: () => Date.now(),
  secs: (n) => n * 1000,
  millis: (n) => n,
};
"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_names_resolve() {
        assert!(is_runtime_name("println"));
        assert!(is_runtime_name("channel"));
        assert!(is_runtime_name("sha256"));
        assert!(!is_runtime_name("user_function"));
        assert!(!is_runtime_name("Print"));
    }

    #[test]
    fn stub_defines_every_declared_name() {
        let stub = stub_text();
        for name in NAMES {
            assert!(
                stub.contains(&format!("{name}: ")),
                "stub is missing runtime name {name}"
            );
        }
    }

    #[test]
    fn stub_is_ascii_and_newline_terminated() {
        assert!(stub_text().is_ascii());
        assert!(stub_text().ends_with("};\n"));
    }
}

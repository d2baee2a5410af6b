//! Embedded single-page HTML frontend.
//!
//! The whole quiz UI is one HTML constant with inline CSS and JavaScript.
//! It talks to the JSON API on the same origin and keeps the player name
//! in `localStorage`.

/// The complete HTML frontend as a static string.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Irregular Verbs Quiz</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{
  --bg:#f4f5fb;
  --card:#ffffff;
  --text:#222336;
  --muted:#72748a;
  --accent:#4756d6;
  --accent-hover:#3844b5;
  --border:#dcdfee;
  --success:#2e9e6a;
  --error:#d9434f;
}
html,body{min-height:100%;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;background:var(--bg);color:var(--text)}
body{display:flex;justify-content:center;padding:32px 16px}
main{width:100%;max-width:520px;display:flex;flex-direction:column;gap:16px}
h1{font-size:22px;font-weight:600}
h1 span{color:var(--accent)}
.card{background:var(--card);border:1px solid var(--border);border-radius:12px;padding:20px}
.row{display:flex;gap:8px;align-items:center}
label{font-size:13px;color:var(--muted);display:block;margin-bottom:4px}
input{width:100%;padding:10px 12px;border:1px solid var(--border);border-radius:8px;font-size:15px}
input:focus{outline:2px solid var(--accent);border-color:transparent}
button{padding:10px 16px;border:0;border-radius:8px;background:var(--accent);color:#fff;font-size:14px;cursor:pointer}
button:hover{background:var(--accent-hover)}
button.secondary{background:transparent;color:var(--accent);border:1px solid var(--accent)}
.verb{font-size:30px;font-weight:700;text-align:center}
.translation{font-size:14px;color:var(--muted);text-align:center;margin-bottom:16px}
.fields{display:grid;grid-template-columns:1fr 1fr;gap:12px;margin-bottom:12px}
.feedback{min-height:22px;font-size:14px;text-align:center}
.feedback.correct{color:var(--success)}
.feedback.incorrect{color:var(--error)}
.counter{font-size:13px;color:var(--muted);text-align:right}
.bar{height:8px;border-radius:4px;background:var(--border);overflow:hidden;margin-top:8px}
.bar div{height:100%;width:0;background:var(--success);transition:width .3s}
</style>
</head>
<body>
<main>
  <h1>Irregular <span>Verbs</span> Quiz</h1>

  <section class="card">
    <label for="pseudo">Player name</label>
    <div class="row">
      <input id="pseudo" placeholder="guest">
      <button id="startBtn">Start</button>
    </div>
  </section>

  <section class="card">
    <div class="counter" id="counter"></div>
    <div class="verb" id="verb">&mdash;</div>
    <div class="translation" id="translation"></div>
    <div class="fields">
      <div><label for="past">Past simple</label><input id="past" autocomplete="off"></div>
      <div><label for="participle">Past participle</label><input id="participle" autocomplete="off"></div>
    </div>
    <div class="row">
      <button id="checkBtn">Check</button>
      <button id="nextBtn" class="secondary">Next</button>
    </div>
    <p class="feedback" id="feedback"></p>
  </section>

  <section class="card">
    <div class="row" style="justify-content:space-between">
      <span id="progressText">0 / 0 (0%)</span>
      <button id="resetBtn" class="secondary">Reset progress</button>
    </div>
    <div class="bar"><div id="progressBar"></div></div>
  </section>
</main>
<script>
const $ = (id) => document.getElementById(id);
let quiz = [];
let index = 0;
let answered = false;

function pseudo() {
  return $('pseudo').value.trim() || 'guest';
}

function withPseudo(path) {
  return path + '?pseudo=' + encodeURIComponent(pseudo());
}

async function api(path, options) {
  const resp = await fetch(path, options);
  const body = await resp.json();
  if (!resp.ok) throw new Error(body.error || resp.statusText);
  return body;
}

function show() {
  const verb = quiz[index];
  answered = false;
  $('verb').textContent = verb ? verb.infinitive : '—';
  $('translation').textContent = verb ? verb.translation : '';
  $('counter').textContent = verb ? (index + 1) + ' / ' + quiz.length : '';
  $('past').value = '';
  $('participle').value = '';
  $('feedback').textContent = '';
  $('feedback').className = 'feedback';
  $('past').focus();
}

async function start() {
  localStorage.setItem('pseudo', pseudo());
  try {
    quiz = await api('/quiz');
    index = 0;
    show();
    await refreshProgress();
  } catch (e) {
    $('feedback').textContent = e.message;
    $('feedback').className = 'feedback incorrect';
  }
}

async function check() {
  const verb = quiz[index];
  if (!verb || answered) return;
  const past = $('past').value.trim();
  const participle = $('participle').value.trim();
  if (!past || !participle) {
    $('feedback').textContent = 'Please fill in both fields.';
    $('feedback').className = 'feedback incorrect';
    return;
  }
  const result = await api(withPseudo('/answer'), {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({verb_id: verb.id, submitted_past: past, submitted_participle: participle}),
  });
  answered = true;
  const expected = result.expected.past + ' / ' + result.expected.participle;
  $('feedback').textContent = result.correct ? 'Correct! ' + expected : 'Incorrect. Expected: ' + expected;
  $('feedback').className = 'feedback ' + (result.correct ? 'correct' : 'incorrect');
  await refreshProgress();
}

function next() {
  if (index + 1 < quiz.length) {
    index += 1;
    show();
  } else {
    start();
  }
}

async function refreshProgress() {
  const p = await api(withPseudo('/progress'));
  $('progressText').textContent = p.successCount + ' / ' + p.total + ' (' + p.rate + '%)';
  $('progressBar').style.width = p.rate + '%';
}

async function reset() {
  const r = await api(withPseudo('/reset'), {method: 'POST'});
  $('feedback').textContent = r.deleted + ' answers erased.';
  $('feedback').className = 'feedback';
  await refreshProgress();
}

$('startBtn').addEventListener('click', start);
$('checkBtn').addEventListener('click', check);
$('nextBtn').addEventListener('click', next);
$('resetBtn').addEventListener('click', reset);
$('participle').addEventListener('keydown', (e) => { if (e.key === 'Enter') (answered ? next() : check()); });

window.addEventListener('load', () => {
  $('pseudo').value = localStorage.getItem('pseudo') || '';
  start();
});
</script>
</body>
</html>
"##;

//! Behavior script embedded in every exported document.
//!
//! Theme switching always runs. Grading only wires up when the page has
//! the check/reset controls and a `quiz-data` island, so results documents
//! stay inert.
//!
//! Grading state machine:
//!
//! - **Ungraded** (initial): inputs enabled, explanations hidden.
//! - **Graded**: entered on "Check Answers". Each question is evaluated with
//!   exact set equality against the island, options get the same four-way
//!   classes as the results builder, inputs are disabled and the summary
//!   shows `Math.round((correct / total) * 100)`.
//! - "Reset Quiz" returns to Ungraded.
//!
//! The evaluation here must stay in lockstep with
//! `quizforge_core::evaluator`; the agreement tests in this crate guard it.

/// `localStorage` key used by exported documents for the chosen theme.
pub const THEME_STORAGE_KEY: &str = "quizforge-export.theme";

pub(crate) const BEHAVIOR_SCRIPT: &str = r#"
(function () {
  'use strict';

  var STORAGE_KEY = 'quizforge-export.theme';
  var MARK_CLASSES = ['correct', 'incorrect', 'user-choice'];
  var root = document.documentElement;
  var themeSelector = document.getElementById('themeSelector');

  function each(list, fn) {
    Array.prototype.forEach.call(list, fn);
  }

  function readTheme() {
    try { return window.localStorage.getItem(STORAGE_KEY); } catch (e) { return null; }
  }

  function storeTheme(theme) {
    try { window.localStorage.setItem(STORAGE_KEY, theme); } catch (e) { /* storage disabled */ }
  }

  function applyTheme(theme) {
    var known = false;
    each(themeSelector.options, function (opt) { if (opt.value === theme) known = true; });
    if (!known) return;
    root.setAttribute('data-theme', theme);
    themeSelector.value = theme;
  }

  if (themeSelector) {
    themeSelector.addEventListener('change', function (e) {
      applyTheme(e.target.value);
      storeTheme(e.target.value);
    });
    var savedTheme = readTheme();
    if (savedTheme) applyTheme(savedTheme);
  }

  var checkBtn = document.getElementById('check-answers-btn');
  var resetBtn = document.getElementById('reset-btn');
  var summary = document.getElementById('results-summary');
  var dataEl = document.getElementById('quiz-data');
  if (!checkBtn || !resetBtn || !summary || !dataEl) return;

  var questionsData = JSON.parse(dataEl.textContent || '[]');

  function correctIndices(info) {
    var out = [];
    info.options.forEach(function (opt, i) { if (opt.isCorrect) out.push(i); });
    return out;
  }

  function selectedIndices(inputs) {
    var out = [];
    each(inputs, function (input, i) { if (input.checked) out.push(i); });
    return out;
  }

  function isCorrect(correct, selected) {
    return correct.length === selected.length &&
      correct.every(function (i) { return selected.indexOf(i) !== -1; });
  }

  function classify(optionCorrect, optionSelected) {
    if (optionCorrect && optionSelected) return { classes: ['correct', 'user-choice'], symbol: '✓' };
    if (optionCorrect) return { classes: ['correct'], symbol: '✓' };
    if (optionSelected) return { classes: ['incorrect', 'user-choice'], symbol: '✗' };
    return { classes: [], symbol: '' };
  }

  function grade() {
    var correctCount = 0;
    var total = questionsData.length;

    each(document.querySelectorAll('.question'), function (qEl, qIndex) {
      var info = questionsData[qIndex];
      if (!info) return;
      var inputs = qEl.querySelectorAll('input');
      var correct = correctIndices(info);
      var selected = selectedIndices(inputs);
      if (isCorrect(correct, selected)) correctCount++;

      each(inputs, function (input, oIndex) {
        var optionEl = input.closest('.option');
        if (optionEl) {
          var mark = classify(correct.indexOf(oIndex) !== -1, selected.indexOf(oIndex) !== -1);
          mark.classes.forEach(function (c) { optionEl.classList.add(c); });
          var markerEl = optionEl.querySelector('.marker');
          if (markerEl) markerEl.textContent = mark.symbol;
          var explanationEl = optionEl.querySelector('.explanation');
          if (explanationEl) explanationEl.classList.add('visible');
        }
        input.disabled = true;
      });
    });

    var score = total > 0 ? (correctCount / total) * 100 : 0;

    summary.textContent = '';
    var heading = document.createElement('h2');
    heading.appendChild(document.createTextNode('Final Score: '));
    var scoreEl = document.createElement('span');
    scoreEl.className = 'score';
    scoreEl.textContent = Math.round(score) + '%';
    heading.appendChild(scoreEl);
    var detail = document.createElement('p');
    detail.textContent = correctCount + ' of ' + total + ' correct';
    summary.appendChild(heading);
    summary.appendChild(detail);
    summary.setAttribute('data-score', String(score));

    summary.classList.remove('hidden');
    checkBtn.classList.add('hidden');
    resetBtn.classList.remove('hidden');
  }

  function reset() {
    each(document.querySelectorAll('.question'), function (qEl) {
      each(qEl.querySelectorAll('input'), function (input) {
        input.checked = false;
        input.disabled = false;
        var optionEl = input.closest('.option');
        if (!optionEl) return;
        MARK_CLASSES.forEach(function (c) { optionEl.classList.remove(c); });
        var markerEl = optionEl.querySelector('.marker');
        if (markerEl) markerEl.textContent = '';
        var explanationEl = optionEl.querySelector('.explanation');
        if (explanationEl) explanationEl.classList.remove('visible');
      });
    });

    summary.textContent = '';
    summary.removeAttribute('data-score');
    summary.classList.add('hidden');
    checkBtn.classList.remove('hidden');
    resetBtn.classList.add('hidden');
  }

  checkBtn.addEventListener('click', grade);
  resetBtn.addEventListener('click', reset);
})();
"#;

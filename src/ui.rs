use crate::format::period_text;
use crate::period::DateRange;
use serde::Serialize;

/// Per-chart rendering options, handed to the page's `drawChart` call
/// instead of living in shared chart defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ChartTheme {
    pub font_family: String,
    pub income_color: String,
    pub expenses_color: String,
    pub grid_color: String,
    pub mobile_breakpoint: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            font_family: "Cairo, Tajawal, sans-serif".to_string(),
            income_color: "rgb(16, 185, 129)".to_string(),
            expenses_color: "rgb(239, 68, 68)".to_string(),
            grid_color: "rgba(0, 0, 0, 0.06)".to_string(),
            mobile_breakpoint: 640,
        }
    }
}

pub fn render_index(range: &DateRange, theme: &ChartTheme) -> String {
    let theme_json = serde_json::to_string(theme).unwrap_or_else(|_| "{}".to_string());
    INDEX_HTML
        .replace("{{START}}", &range.start_key())
        .replace("{{END}}", &range.end_key())
        .replace("{{PERIOD_TEXT}}", &period_text(range))
        .replace("{{THEME}}", &theme_json)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>التقرير المالي</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --good: #059669;
      --bad: #dc2626;
      --shadow: 0 18px 40px rgba(31, 41, 55, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: Cairo, Tajawal, sans-serif;
      padding: 24px 14px 40px;
    }

    .app {
      width: min(1040px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 22px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .period {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    .period input {
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid #d1d5db;
    }

    button {
      border: none;
      border-radius: 10px;
      padding: 9px 14px;
      font-weight: 600;
      cursor: pointer;
      background: #e5e7eb;
    }

    button.primary {
      background: #2563eb;
      color: white;
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px;
      display: grid;
      gap: 6px;
    }

    .card .label {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .card .value {
      font-size: 1.5rem;
      font-weight: 700;
    }

    .change-badge.positive {
      color: var(--good);
    }

    .change-badge.negative {
      color: var(--bad);
    }

    #chart {
      width: 100%;
      height: 300px;
      display: block;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: var(--bad);
    }

    .details {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
    }

    .details h2 {
      margin: 0 0 8px;
      font-size: 1.1rem;
    }

    .details table {
      width: 100%;
      border-collapse: collapse;
    }

    .details td {
      padding: 8px 4px;
      border-top: 1px solid #e5e7eb;
      vertical-align: top;
    }

    .details td:not(:first-child) {
      text-align: left;
      white-space: nowrap;
    }

    .details .note {
      color: var(--muted);
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>التقرير المالي</h1>
      <p id="period-text">{{PERIOD_TEXT}}</p>
    </header>

    <section class="period">
      <input type="date" id="start-date" value="{{START}}" />
      <input type="date" id="end-date" value="{{END}}" />
      <button class="primary" id="apply" type="button">تطبيق</button>
      <button class="quick-period" data-period="today" type="button">اليوم</button>
      <button class="quick-period" data-period="week" type="button">الأسبوع</button>
      <button class="quick-period" data-period="month" type="button">الشهر</button>
      <button class="quick-period" data-period="year" type="button">السنة</button>
      <button id="export" type="button" disabled>تصدير</button>
    </section>

    <section class="cards">
      <div class="card">
        <span class="label">إجمالي الإيرادات</span>
        <span class="value" id="total-income">--</span>
        <span id="income-change"></span>
      </div>
      <div class="card">
        <span class="label">إجمالي المصروفات</span>
        <span class="value" id="total-expenses">--</span>
        <span id="expense-change"></span>
      </div>
      <div class="card">
        <span class="label">صافي الربح</span>
        <span class="value" id="net-profit">--</span>
        <span id="profit-change"></span>
      </div>
    </section>

    <section class="card">
      <svg id="chart" viewBox="0 0 640 300" role="img" aria-label="الإيرادات والمصروفات"></svg>
    </section>

    <section class="details">
      <div class="card">
        <h2>تفاصيل الإيرادات</h2>
        <table><tbody id="income-tbody"></tbody></table>
      </div>
      <div class="card">
        <h2>تفاصيل المصروفات</h2>
        <table><tbody id="expenses-tbody"></tbody></table>
      </div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const theme = {{THEME}};
    const startEl = document.getElementById('start-date');
    const endEl = document.getElementById('end-date');
    const exportBtn = document.getElementById('export');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');

    const isMobile = () => window.innerWidth < theme.mobile_breakpoint;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const viewId = (() => {
      let id = sessionStorage.getItem('report-view');
      if (!id) {
        id = window.crypto && crypto.randomUUID
          ? crypto.randomUUID()
          : `${Date.now()}-${Math.random().toString(16).slice(2)}`;
        sessionStorage.setItem('report-view', id);
      }
      return id;
    })();

    const setChange = (id, change) => {
      const el = document.getElementById(id);
      if (!change) {
        el.textContent = '';
        el.className = '';
        return;
      }
      const arrow = change.percent >= 0 ? '▲' : '▼';
      el.textContent = `${arrow} ${Math.abs(change.percent).toFixed(1)}%`;
      el.className = `change-badge ${change.is_improvement ? 'positive' : 'negative'}`;
    };

    const drawChart = (svg, chart, options) => {
      if (chart.state !== 'ready') {
        svg.innerHTML = `<text x="50%" y="50%" text-anchor="middle" fill="#666" font-family="${options.font_family}">${chart.message}</text>`;
        return;
      }

      const { series, axis_bounds: bounds } = chart;
      const width = 640;
      const height = 300;
      const left = 70;
      const right = 16;
      const top = 16;
      const bottom = 36;
      const span = bounds.suggested_max - bounds.suggested_min || 1;
      const step = series.labels.length > 1 ? (width - left - right) / (series.labels.length - 1) : 0;
      const x = (index) => left + index * step;
      const y = (value) => height - bottom - ((value - bounds.suggested_min) / span) * (height - top - bottom);

      const line = (values, color) => {
        const d = values.map((value, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(1)} ${y(value).toFixed(1)}`).join(' ');
        const dots = values.map((value, index) => `<circle cx="${x(index)}" cy="${y(value)}" r="3" fill="${color}" />`).join('');
        return `<path d="${d}" fill="none" stroke="${color}" stroke-width="2" />${dots}`;
      };

      const grid = chart.axis_ticks
        .map((tick) => `<line x1="${left}" x2="${width - right}" y1="${y(tick.value)}" y2="${y(tick.value)}" stroke="${options.grid_color}" />`
          + `<text x="${left - 6}" y="${y(tick.value) + 4}" text-anchor="end" font-size="10" font-family="${options.font_family}">${tick.label}</text>`)
        .join('');

      const every = Math.max(1, Math.ceil(series.labels.length / (isMobile() ? 6 : 12)));
      const labels = series.labels
        .map((label, index) => (index % every === 0
          ? `<text x="${x(index)}" y="${height - 12}" text-anchor="middle" font-size="10" font-family="${options.font_family}">${label}</text>`
          : ''))
        .join('');

      svg.innerHTML = `${grid}${line(series.income, options.income_color)}${line(series.expenses, options.expenses_color)}${labels}`;
    };

    const renderRows = (id, rows) => {
      document.getElementById(id).replaceChildren(...rows.map((row) => {
        const tr = document.createElement('tr');
        const label = document.createElement('td');
        const title = document.createElement('strong');
        title.textContent = row.label;
        label.append(title);
        if (row.note) {
          const note = document.createElement('div');
          note.className = 'note';
          note.textContent = row.note;
          label.append(note);
        }
        const quantity = document.createElement('td');
        quantity.textContent = row.quantity;
        const amount = document.createElement('td');
        amount.textContent = row.amount_text;
        tr.append(label, quantity, amount);
        return tr;
      }));
    };

    const render = (report) => {
      startEl.value = report.period.start;
      endEl.value = report.period.end;
      document.getElementById('period-text').textContent = report.period.text;
      document.getElementById('total-income').textContent = report.summary_text.total_income;
      document.getElementById('total-expenses').textContent = report.summary_text.total_costs;
      document.getElementById('net-profit').textContent = report.summary_text.net_profit;
      setChange('income-change', report.changes.income);
      setChange('expense-change', report.changes.expenses);
      setChange('profit-change', report.changes.profit);
      drawChart(chartEl, report.chart, theme);
      renderRows('income-tbody', report.details.income);
      renderRows('expenses-tbody', report.details.expenses);
    };

    // Responses that arrive after a newer request was issued are dropped.
    let latestRequest = 0;

    const loadReport = async (params) => {
      const request = ++latestRequest;
      setStatus('جاري التحميل...', 'info');
      exportBtn.disabled = true;
      params.set('mode', isMobile() ? 'mobile' : 'desktop');
      params.set('view', viewId);
      try {
        const res = await fetch(`/api/report?${params}`);
        if (request !== latestRequest || res.status === 409) {
          return;
        }
        if (!res.ok) {
          throw new Error(await res.text() || `HTTP ${res.status}`);
        }
        const report = await res.json();
        if (request !== latestRequest) {
          return;
        }
        render(report);
        exportBtn.disabled = false;
        setStatus('', '');
      } catch (err) {
        if (request === latestRequest) {
          setStatus(`حدث خطأ أثناء تحميل التقرير: ${err.message}`, 'error');
        }
      }
    };

    document.getElementById('apply').addEventListener('click', () => {
      if (!startEl.value || !endEl.value) {
        setStatus('الرجاء اختيار تاريخ البداية والنهاية', 'error');
        return;
      }
      loadReport(new URLSearchParams({ start: startEl.value, end: endEl.value }));
    });

    document.querySelectorAll('.quick-period').forEach((button) => {
      button.addEventListener('click', () => {
        loadReport(new URLSearchParams({ period: button.dataset.period }));
      });
    });

    exportBtn.addEventListener('click', () => {
      const params = new URLSearchParams({ start: startEl.value, end: endEl.value });
      window.location.href = `/api/report/export?${params}`;
    });

    loadReport(new URLSearchParams({ start: startEl.value, end: endEl.value }));
  </script>
</body>
</html>
"##;

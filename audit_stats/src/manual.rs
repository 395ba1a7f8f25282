/*!

This is the long-form manual for `audit_stats` and `qaaudit`.

## Input sheets

The first worksheet of the uploaded workbook is read, unless a worksheet name
is given. The first row is the header, every following row is one audited call.
Header names are trimmed of surrounding whitespace. The comparison with the
names below is case-sensitive.

### Team, RM and call duration

These three fields accept several header names. The first name of each list
that is present in the sheet is used, the others are ignored:

| field    | accepted headers, in order |
|----------|----------------------------|
| team     | `Franchise`, `Team Name`, `Team`, `franchise` |
| RM name  | `Name`, `Sl. Name`, `RM Name`, `Name `, `Name.` |
| duration | `Call Duration`, `CallDuration`, `Duration`, `call duration` |

A missing field is not an error: the rows simply have no value for it, and the
reports that depend on it stay empty. Pass `--require team` (or `rm`,
`duration`) to turn a missing column into an error instead.

Call durations may be written `H:MM:SS`, `MM:SS`, or as a plain number of
minutes. Cells with an Excel time or duration format (`hh:mm:ss`, `mm:ss`,
`[h]:mm:ss`, ...) are read as `H:MM:SS`, hours past 24 included. A date in
the duration column, or anything else, is treated as a missing duration.

### Percent score

The `%age` column is used when present, as it is. Otherwise, when both
`Total Score` and `Total` are present, the percent score is
`Total Score / Total * 100`. A zero or missing total gives a missing score.

### Scoring parameters

The following columns are averaged in the full report when present:
`Introduction`, `Project Registration`, `Product & Pricing requirement`,
`Product FeedBack`, `Cross & upsell of product`, `Marketing Benefit`,
`Redem tion`, `Call Closure`, `GTM Adherence`, `CRM Update`, `Softskill`.

## Reports

* `full` the overall average and standard deviation, the average of each
scoring parameter, the per-team breakdown, and the relationship between call
duration and score when more than 5 calls have both values.
* `team` per team: average, median, standard deviation and number of scored audits.
* `rm` per RM: average and number of audits, ranked from the best average. The
top and bottom 5 (see `--top`) are listed separately.

## Status log

`qaaudit save-status` appends the scoring form of one call to
`qa_status_log.csv` in the reports directory. The file is created with a header
row the first time:

```text
timestamp,evaluator,rm_name,team_name,rm_captain,date_of_audit,aid_mobile,call_date,
Introduction,...,Softskill,Total Score,Total,%age,Audit Observation,status
```

## Configuration

`qaaudit --config audit.json` reads the settings below. All of them are
optional and the command line flags take precedence.

```json
{
  "uploadDirectory": "uploads",
  "reportsDirectory": "reports",
  "worksheetName": "Sheet1",
  "reportMode": "full",
  "topN": 5,
  "requiredColumns": ["team"]
}
```

*/
